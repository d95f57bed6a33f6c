//! User lifecycle manager.
//!
//! Owns the "one user per email" invariant and the cache-consistency
//! protocol: reads may be served from TTL-bounded cache snapshots, writes
//! go through the transactional store and invalidate the snapshot after
//! commit. The cache is advisory; every cache failure is absorbed here
//! and degrades to a store round-trip, never to an error for the caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;
use validator::ValidateEmail;

use common::{AppError, AppResult, CacheStore};
use domain::{Password, User, CACHE_PREFIX_USER, DEFAULT_CACHE_TTL_SECONDS};

use crate::repository::{NewUser, UnitOfWork};

/// User lifecycle operations exposed to the transports.
///
/// Every returned [`User`] has the password hash cleared; the single
/// exception is the internal credential lookup used by the auth service.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new account. Fails with a conflict when the email is
    /// already taken by an active user.
    async fn create_user(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Fetch one account, cache-first.
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Overwrite profile fields supplied as `Some`. A non-empty password
    /// replaces the stored credential hash; `None` or an empty string
    /// keeps the current one.
    async fn update_user(
        &self,
        id: Uuid,
        email: Option<String>,
        name: Option<String>,
        password: Option<String>,
    ) -> AppResult<User>;

    /// Remove an account; subsequent gets report NotFound.
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Credential lookup for the auth service. This is the only path that
    /// returns the password hash and must never be exposed through the
    /// public gateway.
    async fn get_user_by_email_internal(&self, email: &str) -> AppResult<User>;
}

/// Concrete lifecycle manager over a unit of work and a best-effort cache.
///
/// Holds no mutable state of its own; all coordination between concurrent
/// callers is pushed into the store's transaction mechanism.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_seconds: u64,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            uow,
            cache,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl_seconds = ttl_seconds;
        self
    }

    fn cache_key(id: &Uuid) -> String {
        format!("{}{}", CACHE_PREFIX_USER, id)
    }

    /// Cache read with every failure degraded to a miss.
    async fn cached_user(&self, key: &str) -> Option<User> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, "Cache read failed, falling through to store: {}", err);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(key, "Discarding undecodable cache entry: {}", err);
                None
            }
        }
    }

    /// Best-effort cache population. The snapshot is serialized from a
    /// scrubbed record, so it never contains the password hash.
    async fn store_snapshot(&self, key: &str, user: &User) {
        let bytes = match serde_json::to_vec(user) {
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

    /// Best-effort invalidation after a committed write. A lost delete
    /// leaves a stale entry whose lifetime is bounded by the TTL.
    async fn invalidate_snapshot(&self, id: &Uuid) {
        let key = Self::cache_key(id);
        if let Err(err) = self.cache.delete(&key).await {
            warn!(key = %key, "Cache invalidation failed: {}", err);
        }
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(())
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, email: String, password: String, name: String) -> AppResult<User> {
        validate_email(&email)?;
        validate_name(&name)?;

        // Hashing also validates the password length, so malformed input
        // is rejected before a transaction is opened. The plaintext never
        // goes further than this call.
        let password_hash = Password::new(&password)?.into_string();

        let user = self
            .uow
            .transaction(move |store| {
                Box::pin(async move {
                    // Duplicate check and insert share one transaction; a
                    // concurrent creator that slips between them hits the
                    // unique index and surfaces as the same conflict.
                    if store.find_by_email(&email).await?.is_some() {
                        return Err(AppError::conflict("User"));
                    }

                    store
                        .insert(NewUser {
                            email,
                            password_hash,
                            name,
                        })
                        .await
                })
            })
            .await?;

        // No cache population here; the first get fills it lazily.
        Ok(user.scrubbed())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        let key = Self::cache_key(&id);
        if let Some(user) = self.cached_user(&key).await {
            return Ok(user);
        }

        let user = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?
            .scrubbed();

        self.store_snapshot(&key, &user).await;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: Option<String>,
        name: Option<String>,
        password: Option<String>,
    ) -> AppResult<User> {
        if let Some(ref email) = email {
            validate_email(email)?;
        }
        if let Some(ref name) = name {
            validate_name(name)?;
        }
        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        let user = self
            .uow
            .transaction(move |store| {
                Box::pin(async move {
                    let mut user = store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

                    if let Some(email) = email {
                        // Changing the address must not collide with
                        // another active account.
                        if email != user.email && store.find_by_email(&email).await?.is_some() {
                            return Err(AppError::conflict("Email"));
                        }
                        user.email = email;
                    }
                    if let Some(name) = name {
                        user.name = name;
                    }
                    if let Some(hash) = password_hash {
                        user.password_hash = hash;
                    }
                    user.updated_at = Utc::now();

                    store.save(&user).await?;
                    Ok(user)
                })
            })
            .await?;

        self.invalidate_snapshot(&id).await;
        Ok(user.scrubbed())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .transaction(move |store| {
                Box::pin(async move {
                    store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
                    store.delete(id).await
                })
            })
            .await?;

        self.invalidate_snapshot(&id).await;
        Ok(())
    }

    async fn get_user_by_email_internal(&self, email: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)
    }
}
