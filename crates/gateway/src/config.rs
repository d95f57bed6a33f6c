//! Gateway configuration.

use std::env;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Auth service gRPC endpoint
    pub auth_service_url: String,
    /// User service gRPC endpoint
    pub user_service_url: String,
    /// Payment service gRPC endpoint
    pub payment_service_url: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:50051".to_string()),
            user_service_url: env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:50052".to_string()),
            payment_service_url: env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:50053".to_string()),
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_service_url: "http://localhost:50051".to_string(),
            user_service_url: "http://localhost:50052".to_string(),
            payment_service_url: "http://localhost:50053".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
