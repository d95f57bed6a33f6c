//! Best-effort cache adapter over Redis.
//!
//! The cache holds advisory copies only; the relational store stays
//! authoritative. Callers must treat every error from [`CacheStore::get`]
//! as a miss and must not fail their operation when a write or an
//! invalidation fails.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::debug;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::error::AppResult;

/// Capability interface for a TTL-bounded key/value accelerator.
///
/// Exactly the three operations the lifecycle services need; nothing of
/// the backing technology leaks through.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a serialized snapshot. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store a serialized snapshot with an expiry in seconds.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> AppResult<()>;

    /// Drop a snapshot. Failure leaves a stale entry that expires by TTL.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Redis-backed cache with a pooled connection manager.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis, returning an error instead of panicking so that
    /// callers can degrade to store-only operation.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// Cache used when no Redis instance is reachable at startup: every read
/// misses and every write succeeds, so the services run store-only.
pub struct DisabledCache;

#[async_trait]
impl CacheStore for DisabledCache {
    async fn get(&self, _key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_cache_always_misses() {
        let cache = DisabledCache;
        cache.set("user:1", b"payload".to_vec(), 300).await.unwrap();
        assert!(cache.get("user:1").await.unwrap().is_none());
        cache.delete("user:1").await.unwrap();
    }
}
