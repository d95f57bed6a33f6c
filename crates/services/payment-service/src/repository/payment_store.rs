//! Store adapter for payment records.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Payment;

use super::entities::payment::{self, ActiveModel, Entity as PaymentEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Data for a payment row that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub provider_id: String,
    pub status: String,
}

/// Capability interface over the payment store.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a new row; identifier and timestamps are assigned here.
    async fn insert(&self, payment: NewPayment) -> AppResult<Payment>;

    /// Fetch one payment by its provider intent id.
    async fn find_by_provider_id(&self, provider_id: &str) -> AppResult<Option<Payment>>;

    /// Overwrite the full record identified by `payment.id`.
    async fn save(&self, payment: &Payment) -> AppResult<()>;
}

/// SeaORM-backed payment store.
pub struct PgPaymentStore {
    db: DatabaseConnection,
}

impl PgPaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentStore {
    async fn insert(&self, data: NewPayment) -> AppResult<Payment> {
        let now = Utc::now();
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(data.user_id),
            amount_minor: Set(data.amount_minor),
            currency: Set(data.currency),
            provider_id: Set(data.provider_id),
            status: Set(data.status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let row = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Payment::from(row))
    }

    async fn find_by_provider_id(&self, provider_id: &str) -> AppResult<Option<Payment>> {
        let row = PaymentEntity::find()
            .filter(payment::Column::ProviderId.eq(provider_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(Payment::from))
    }

    async fn save(&self, record: &Payment) -> AppResult<()> {
        let active = ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            amount_minor: Set(record.amount_minor),
            currency: Set(record.currency.clone()),
            provider_id: Set(record.provider_id.clone()),
            status: Set(record.status.clone()),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}
