//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::{AuthClient, PaymentClient, UserClient};
use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_client: Arc<AuthClient>,
    pub user_client: Arc<UserClient>,
    pub payment_client: Arc<PaymentClient>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        auth_client: Arc<AuthClient>,
        user_client: Arc<UserClient>,
        payment_client: Arc<PaymentClient>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            auth_client,
            user_client,
            payment_client,
            config,
        }
    }
}
