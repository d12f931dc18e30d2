//! Append-only transaction ledger
//!
//! Entries are kept newest-first and never modified once recorded. Each entry
//! stays tied to the network that was active when it was created.

mod types;

pub use types::*;

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ValidationError;
use crate::network::Network;

/// Counterparty of the seeded history entries
pub const SEED_COUNTERPARTY: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// A new entry, before the ledger assigns its id
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub direction: Direction,
    pub amount: Decimal,
    pub counterparty_address: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub network: Network,
}

/// Ordered, append-only collection of transactions, newest first
#[derive(Debug, Clone)]
pub struct Ledger {
    entries: VecDeque<Transaction>,
    next_seq: u64,
}

impl Ledger {
    /// Create an empty ledger whose first id is `tx-1`
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_seq: 1,
        }
    }

    /// The initial history every session starts from, tied to `network`.
    /// Ids run `tx-1` (newest) to `tx-4`; new entries continue at `tx-5`.
    pub fn seeded(network: &Network, now: DateTime<Utc>) -> Self {
        let history = [
            (Direction::Receive, Decimal::new(5, 1), Duration::hours(2)),
            (Direction::Send, Decimal::new(1, 1), Duration::days(1)),
            (Direction::Receive, Decimal::new(12, 1), Duration::days(3)),
            (Direction::Send, Decimal::new(5, 2), Duration::days(5)),
        ];

        let entries: VecDeque<Transaction> = history
            .into_iter()
            .enumerate()
            .map(|(i, (direction, amount, age))| Transaction {
                id: format!("tx-{}", i + 1),
                direction,
                amount,
                counterparty_address: SEED_COUNTERPARTY.to_string(),
                timestamp: now - age,
                status: TransactionStatus::Completed,
                network: network.clone(),
            })
            .collect();

        Self {
            next_seq: entries.len() as u64 + 1,
            entries,
        }
    }

    /// Prepend an entry and return it. Rejects non-positive amounts.
    pub fn record(&mut self, entry: NewTransaction) -> Result<&Transaction, ValidationError> {
        if entry.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(entry.amount));
        }

        let transaction = Transaction {
            id: format!("tx-{}", self.next_seq),
            direction: entry.direction,
            amount: entry.amount,
            counterparty_address: entry.counterparty_address,
            timestamp: entry.timestamp,
            status: entry.status,
            network: entry.network,
        };
        self.next_seq += 1;

        debug!(id = %transaction.id, network = %transaction.network.id, "transaction recorded");
        self.entries.push_front(transaction);
        Ok(&self.entries[0])
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// Entry at `index`, where 0 is the newest
    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.entries.get(index)
    }

    /// Find an entry by id
    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Entries created on `network_id`, newest first
    pub fn for_network<'a>(&'a self, network_id: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.entries.iter().filter(move |t| t.network.id == network_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
