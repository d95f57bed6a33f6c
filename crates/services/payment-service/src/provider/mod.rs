//! Payment provider boundary.

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

mod sandbox;

pub use sandbox::SandboxProvider;

/// An intent as reported by the external provider.
#[derive(Debug, Clone)]
pub struct ProviderIntent {
    /// Provider-assigned intent identifier
    pub id: String,
    /// Secret handed to the paying client, present at creation only
    pub client_secret: String,
    /// Provider-reported status
    pub status: String,
}

/// Capability interface over the external payment provider.
///
/// Exactly the two calls the payment flow needs; a production
/// implementation wraps the provider's API, the in-tree sandbox serves
/// development and tests.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a new payment intent for the given amount.
    async fn create_intent(&self, amount_minor: i64, currency: &str) -> AppResult<ProviderIntent>;

    /// Fetch the current state of an existing intent.
    async fn retrieve_intent(&self, id: &str) -> AppResult<ProviderIntent>;
}
