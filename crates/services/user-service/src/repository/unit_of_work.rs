//! Unit of Work: transaction lifecycle around the store adapter.
//!
//! A transaction body receives a store handle scoped to the open
//! transaction; everything it does through that handle is durably visible
//! afterwards (commit) or not at all (rollback). Rollback is ordinary
//! control flow: any `Err` from the body rolls back, no unwinding involved.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};

use common::{AppError, AppResult};

use super::store::{PgUserStore, TxUserStore, UserStore};

/// Boxed future tied to the lifetime of the transaction scope.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Transaction boundary for the user store.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Store handle outside any transaction, for single reads.
    fn users(&self) -> Arc<dyn UserStore>;

    /// Run `body` inside one atomic unit.
    ///
    /// The body's store handle sees its own uncommitted writes. On `Ok`
    /// the transaction commits (a commit failure is returned as a store
    /// error); on `Err` it rolls back and the error passes through
    /// unchanged.
    async fn transaction<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a (dyn UserStore + 'a)) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// SeaORM-backed unit of work over a PostgreSQL pool.
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<PgUserStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone()));
        Self { db, users }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserStore> {
        self.users.clone()
    }

    async fn transaction<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a (dyn UserStore + 'a)) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Read-committed is sufficient here: the partial unique index on
        // email catches writers that race past the duplicate check.
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let store = TxUserStore::new(&txn);
        match body(&store).await {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}
