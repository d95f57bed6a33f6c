//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod payment_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, LoginRequest, RegisterRequest};
pub use health_handler::health_routes;
pub use payment_handler::{
    payment_routes, CreatePaymentIntentRequest, CreatePaymentIntentResponse,
    RetrievePaymentIntentRequest,
};
pub use user_handler::{user_routes, UpdateUserRequest};
