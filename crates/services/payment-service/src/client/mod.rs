//! Clients for collaborating services.

mod user_client;

#[cfg(any(test, feature = "test-utils"))]
pub use user_client::MockUserDirectory;
pub use user_client::{UserClient, UserDirectory};
