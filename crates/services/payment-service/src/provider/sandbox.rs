//! In-memory sandbox provider for development and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};

use super::{PaymentProvider, ProviderIntent};

/// Initial status a freshly created intent reports.
const STATUS_REQUIRES_PAYMENT_METHOD: &str = "requires_payment_method";

/// Deterministic provider that keeps intents in process memory.
///
/// Stands in for the real provider wherever no credentials are
/// configured; intents do not survive a restart.
#[derive(Default)]
pub struct SandboxProvider {
    intents: RwLock<HashMap<String, ProviderIntent>>,
}

impl SandboxProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentProvider for SandboxProvider {
    async fn create_intent(
        &self,
        _amount_minor: i64,
        _currency: &str,
    ) -> AppResult<ProviderIntent> {
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let intent = ProviderIntent {
            id: id.clone(),
            client_secret: format!("{}_secret_{}", id, Uuid::new_v4().simple()),
            status: STATUS_REQUIRES_PAYMENT_METHOD.to_string(),
        };

        self.intents
            .write()
            .map_err(|_| AppError::internal("Sandbox intent map poisoned"))?
            .insert(id, intent.clone());

        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> AppResult<ProviderIntent> {
        self.intents
            .read()
            .map_err(|_| AppError::internal("Sandbox intent map poisoned"))?
            .get(id)
            .cloned()
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_intents_can_be_retrieved() {
        let provider = SandboxProvider::new();
        let intent = provider.create_intent(1999, "usd").await.unwrap();

        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.contains("_secret_"));
        assert_eq!(intent.status, STATUS_REQUIRES_PAYMENT_METHOD);

        let fetched = provider.retrieve_intent(&intent.id).await.unwrap();
        assert_eq!(fetched.id, intent.id);
    }

    #[tokio::test]
    async fn unknown_intent_is_not_found() {
        let provider = SandboxProvider::new();
        let result = provider.retrieve_intent("pi_missing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }
}
