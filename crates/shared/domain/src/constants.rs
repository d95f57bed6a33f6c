//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of an ISO 4217 currency code
pub const CURRENCY_CODE_LENGTH: usize = 3;

// =============================================================================
// Caching
// =============================================================================

/// Cache key prefix for user snapshots
pub const CACHE_PREFIX_USER: &str = "user:";

/// Cache key prefix for payment snapshots
pub const CACHE_PREFIX_PAYMENT: &str = "payment:";

/// Time-to-live for cached snapshots, in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
