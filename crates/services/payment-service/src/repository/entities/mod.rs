//! SeaORM entity definitions.

pub mod payment;
