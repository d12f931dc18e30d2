//! Wallet record and address helpers

mod wallet;
pub mod address;

pub use wallet::*;
pub use address::{truncate_address, validate_address};
