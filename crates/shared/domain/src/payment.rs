//! Payment domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment record tracking an intent held by the external provider.
///
/// Amounts are integer minor units (e.g. cents); the provider boundary is
/// the only place where a currency's minor-unit convention matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Amount in integer minor units
    pub amount_minor: i64,
    /// ISO 4217 currency code, lowercase
    pub currency: String,
    /// Intent identifier assigned by the payment provider
    pub provider_id: String,
    /// Last provider-reported status
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
