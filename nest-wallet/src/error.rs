//! Error types for the nest-wallet library

use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected before any state change
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed secret: expected 0x followed by 64 characters")]
    MalformedSecret,

    #[error("Malformed recipient address for {network}: {address}")]
    MalformedRecipient { address: String, network: String },

    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Decimal, available: Decimal },

    #[error("Balance on {network} has not been reconciled yet")]
    BalanceNotReconciled { network: String },

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Invalid network set: {0}")]
    InvalidNetworkSet(String),
}

/// Custom error type for nest-wallet operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Balance oracle error: {0}")]
    Oracle(String),

    #[error("Network not found: {0}")]
    NetworkNotFound(String),

    #[error("Network source error: {0}")]
    NetworkSource(String),

    #[error("No authenticated session")]
    NotAuthenticated,

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for nest-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
