//! gRPC protocol buffer definitions.
//!
//! Generated service definitions for:
//! - UserService: account lifecycle (create, get, update, delete)
//! - AuthService: login and token verification
//! - PaymentService: payment-intent creation and retrieval

/// User service definitions.
pub mod user {
    tonic::include_proto!("user");
}

/// Authentication service definitions.
pub mod auth {
    tonic::include_proto!("auth");
}

/// Payment service definitions.
pub mod payment {
    tonic::include_proto!("payment");
}

// Re-export commonly used items
pub use auth::auth_service_client::AuthServiceClient;
pub use auth::auth_service_server::{AuthService, AuthServiceServer};
pub use payment::payment_service_client::PaymentServiceClient;
pub use payment::payment_service_server::{PaymentService, PaymentServiceServer};
pub use user::user_service_client::UserServiceClient;
pub use user::user_service_server::{UserService, UserServiceServer};
