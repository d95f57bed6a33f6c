//! Repository layer for payment records.

pub mod entities;
mod payment_store;

#[cfg(any(test, feature = "test-utils"))]
pub use payment_store::MockPaymentStore;
pub use payment_store::{NewPayment, PaymentStore, PgPaymentStore};
