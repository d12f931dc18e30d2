//! Nest Wallet Core - multi-network custodial session manager
//!
//! This library owns the client-side state of a multi-network wallet: the
//! authentication lifecycle, the registry of supported networks and the active
//! one, the wallet record with its balance, and an append-only transaction
//! ledger. Balance refreshes run asynchronously against a pluggable oracle and
//! are applied only while still relevant.

pub mod error;
pub mod config;
pub mod logging;
pub mod crypto;
pub mod account;
pub mod network;
pub mod balance;
pub mod notify;
pub mod ledger;
pub mod session;

// Re-export commonly used types for convenience
pub use error::{Error, Result, ValidationError};
pub use config::SessionConfig;
pub use session::{SessionManager, SessionResult, ReconcileOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
