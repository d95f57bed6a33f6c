//! Auth service configuration.

use std::env;

use domain::DEFAULT_JWT_EXPIRATION_HOURS;

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// User service gRPC endpoint
    pub user_service_url: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT lifetime in hours
    pub jwt_expiration_hours: i64,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            user_service_url: env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:50052".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret-change-me".to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            host: env::var("AUTH_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("AUTH_SERVICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(50051),
        }
    }
}
