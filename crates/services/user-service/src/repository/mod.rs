//! Repository layer: store adapter and transaction boundary.

pub mod entities;
mod store;
mod unit_of_work;

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockUserStore;
pub use store::{NewUser, PgUserStore, TxUserStore, UserStore};
pub use unit_of_work::{Persistence, TxFuture, UnitOfWork};
