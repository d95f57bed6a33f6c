//! Payment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Payment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    #[sea_orm(unique)]
    pub provider_id: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Payment {
            id: model.id,
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            currency: model.currency,
            provider_id: model.provider_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
