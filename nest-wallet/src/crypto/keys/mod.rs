//! Address derivation from imported secrets
//!
//! This module turns a user-supplied private key into the display address of
//! the imported wallet.

pub mod ethereum;
mod derivation;

pub use derivation::*;
pub use ethereum::Secp256k1KeyDeriver;
