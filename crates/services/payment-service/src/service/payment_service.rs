//! Payment-intent flow against the external provider.
//!
//! The provider owns intent state; the local row tracks the last status
//! seen. Retrieval is cache-first with the same absorb-all-cache-failures
//! policy as the user service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use common::{AppError, AppResult, CacheStore};
use domain::{Payment, CACHE_PREFIX_PAYMENT, CURRENCY_CODE_LENGTH, DEFAULT_CACHE_TTL_SECONDS};

use crate::client::UserDirectory;
use crate::provider::PaymentProvider;
use crate::repository::{NewPayment, PaymentStore};

/// Payment operations exposed to the transports.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Open an intent with the provider and persist a tracking record.
    /// Returns the record plus the provider's client secret.
    async fn create_payment_intent(
        &self,
        user_id: Uuid,
        amount_minor: i64,
        currency: String,
    ) -> AppResult<(Payment, String)>;

    /// Fetch an intent's current state, cache-first; on a miss the
    /// provider is consulted and the stored status refreshed.
    async fn retrieve_payment_intent(&self, provider_id: &str) -> AppResult<Payment>;
}

/// Concrete payment manager.
pub struct PaymentManager {
    store: Arc<dyn PaymentStore>,
    provider: Arc<dyn PaymentProvider>,
    users: Arc<dyn UserDirectory>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_seconds: u64,
}

impl PaymentManager {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        provider: Arc<dyn PaymentProvider>,
        users: Arc<dyn UserDirectory>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            store,
            provider,
            users,
            cache,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    fn cache_key(provider_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_PAYMENT, provider_id)
    }

    async fn cached_payment(&self, key: &str) -> Option<Payment> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, "Cache read failed, falling through: {}", err);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(payment) => Some(payment),
            Err(err) => {
                warn!(key, "Discarding undecodable cache entry: {}", err);
                None
            }
        }
    }

    async fn store_snapshot(&self, key: &str, payment: &Payment) {
        let bytes = match serde_json::to_vec(payment) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key, "Cache snapshot serialization failed: {}", err);
                return;
            }
        };

        if let Err(err) = self.cache.set(key, bytes, self.cache_ttl_seconds).await {
            warn!(key, "Cache write failed: {}", err);
        }
    }
}

fn validate_currency(currency: &str) -> AppResult<()> {
    if currency.len() != CURRENCY_CODE_LENGTH || !currency.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(AppError::validation("Invalid currency code"));
    }
    Ok(())
}

#[async_trait]
impl PaymentService for PaymentManager {
    async fn create_payment_intent(
        &self,
        user_id: Uuid,
        amount_minor: i64,
        currency: String,
    ) -> AppResult<(Payment, String)> {
        if amount_minor <= 0 {
            return Err(AppError::validation("Amount must be positive"));
        }
        validate_currency(&currency)?;
        let currency = currency.to_ascii_lowercase();

        if !self.users.user_exists(user_id).await? {
            return Err(AppError::bad_request("Unknown user"));
        }

        let intent = self.provider.create_intent(amount_minor, &currency).await?;

        let payment = self
            .store
            .insert(NewPayment {
                user_id,
                amount_minor,
                currency,
                provider_id: intent.id,
                status: intent.status,
            })
            .await?;

        Ok((payment, intent.client_secret))
    }

    async fn retrieve_payment_intent(&self, provider_id: &str) -> AppResult<Payment> {
        let key = Self::cache_key(provider_id);
        if let Some(payment) = self.cached_payment(&key).await {
            return Ok(payment);
        }

        // The provider is authoritative for status; refresh the local row
        // with whatever it reports now.
        let intent = self.provider.retrieve_intent(provider_id).await?;

        let mut payment = self
            .store
            .find_by_provider_id(provider_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if payment.status != intent.status {
            payment.status = intent.status;
            payment.updated_at = Utc::now();
            self.store.save(&payment).await?;
        }

        self.store_snapshot(&key, &payment).await;
        Ok(payment)
    }
}
