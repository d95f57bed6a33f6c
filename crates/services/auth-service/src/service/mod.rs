//! Business logic layer.

mod auth_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
