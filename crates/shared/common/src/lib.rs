//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling for HTTP and gRPC
//! - The best-effort cache adapter (feature `cache`)

#[cfg(feature = "cache")]
pub mod cache;
pub mod error;

#[cfg(all(feature = "cache", any(test, feature = "test-utils")))]
pub use cache::MockCacheStore;
#[cfg(feature = "cache")]
pub use cache::{CacheStore, DisabledCache, RedisCache};
pub use error::{AppError, AppResult, OptionExt};
