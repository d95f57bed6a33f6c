//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared across the services via the proto crate.

pub mod constants;
pub mod error;
pub mod password;
pub mod payment;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use payment::Payment;
pub use user::{User, UserView};
