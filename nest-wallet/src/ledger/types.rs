//! Ledger entry types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Send,
    Receive,
}

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Submitted but not yet settled
    Pending,
    /// Settled
    Completed,
    /// Rejected or reverted
    Failed,
}

/// An immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// `tx-<n>`, monotonic by insertion
    pub id: String,
    pub direction: Direction,
    /// Strictly positive amount in `network`'s native asset
    pub amount: Decimal,
    /// The other party's address
    pub counterparty_address: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    /// Network active when the entry was created
    pub network: Network,
}
