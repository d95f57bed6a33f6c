//! gRPC clients for the backing services.

mod auth_client;
mod payment_client;
mod user_client;

pub use auth_client::{AuthClient, Claims, TokenResponse};
pub use payment_client::PaymentClient;
pub use user_client::UserClient;
