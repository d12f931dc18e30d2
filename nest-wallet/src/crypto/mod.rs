//! Cryptographic collaborators
//!
//! Seed phrase generation, credential verification, and the derivation of a
//! display address from an imported secret. Each sits behind a trait so the
//! development stand-ins can be swapped for production implementations
//! without touching the session manager.

pub mod mnemonic;
pub mod credentials;
pub mod keys;

pub use mnemonic::*;
pub use credentials::*;
pub use keys::*;
