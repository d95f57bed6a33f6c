//! Store adapter for user records.
//!
//! Two concrete handles implement the same capability trait: one over the
//! connection pool for single reads, one over a borrowed transaction for
//! the atomic write paths. Both route through shared query helpers so the
//! semantics cannot drift apart.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::User;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Data for a user row that has not been persisted yet.
///
/// Identifier and timestamps are assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Capability interface over the authoritative user store.
///
/// All lookups exclude soft-deleted rows. The trait exposes exactly the
/// operations the lifecycle manager needs; nothing of the backing ORM
/// leaks through.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch one active user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Fetch one active user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new row; the returned record carries the assigned
    /// identifier and timestamps.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Overwrite the full record identified by `user.id`.
    async fn save(&self, user: &User) -> AppResult<()>;

    /// Soft-delete by primary key; subsequent lookups report the row
    /// as absent.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

// =============================================================================
// Shared query implementations
// =============================================================================

async fn find_by_id_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<User>> {
    let row = UserEntity::find_by_id(id)
        .filter(user::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(User::from))
}

async fn find_by_email_on<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<Option<User>> {
    let row = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .filter(user::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(AppError::from)?;

    Ok(row.map(User::from))
}

async fn insert_on<C: ConnectionTrait>(conn: &C, data: NewUser) -> AppResult<User> {
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(data.email),
        password_hash: Set(data.password_hash),
        name: Set(data.name),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    // A concurrent writer that races past the duplicate check trips the
    // partial unique index here; From<DbErr> surfaces that as Conflict.
    let row = active.insert(conn).await.map_err(AppError::from)?;
    Ok(User::from(row))
}

async fn save_on<C: ConnectionTrait>(conn: &C, record: &User) -> AppResult<()> {
    let active = ActiveModel {
        id: Set(record.id),
        email: Set(record.email.clone()),
        password_hash: Set(record.password_hash.clone()),
        name: Set(record.name.clone()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
        deleted_at: Set(record.deleted_at),
    };

    active.update(conn).await.map_err(AppError::from)?;
    Ok(())
}

async fn delete_on<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    let row = UserEntity::find_by_id(id)
        .filter(user::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = row.into();
    let now = Utc::now();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);

    active.update(conn).await.map_err(AppError::from)?;
    Ok(())
}

// =============================================================================
// Pool-backed store (single reads outside a transaction)
// =============================================================================

/// Store handle over the connection pool.
pub struct PgUserStore {
    db: DatabaseConnection,
}

impl PgUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id_on(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email_on(&self.db, email).await
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        insert_on(&self.db, user).await
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        save_on(&self.db, user).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete_on(&self.db, id).await
    }
}

// =============================================================================
// Transaction-scoped store
// =============================================================================

/// Store handle borrowing an open transaction. Every operation made
/// through it sees uncommitted writes from the same transaction and
/// commits or rolls back with it.
pub struct TxUserStore<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserStore<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl UserStore for TxUserStore<'_> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id_on(self.txn, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email_on(self.txn, email).await
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        insert_on(self.txn, user).await
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        save_on(self.txn, user).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete_on(self.txn, id).await
    }
}
