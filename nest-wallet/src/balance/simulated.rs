//! In-process oracle that simulates a chain query

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use super::BalanceOracle;

/// Fixed per-network balances with optional latency and failure injection
#[derive(Debug, Default)]
pub struct SimulatedBalanceOracle {
    balances: RwLock<HashMap<String, Decimal>>,
    failing: RwLock<HashSet<String>>,
    latency: Duration,
}

impl SimulatedBalanceOracle {
    /// Create an oracle with no balances and no latency
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances matching the built-in networks
    pub fn demo() -> Self {
        Self::new()
            .with_balance("ethereum", Decimal::new(25438, 4))
            .with_balance("binance", Decimal::new(1275, 2))
            .with_balance("polygon", Decimal::new(3401, 1))
            .with_balance("solana", Decimal::new(825, 1))
    }

    /// Set the balance reported for `network_id`
    pub fn with_balance(self, network_id: &str, balance: Decimal) -> Self {
        self.set_balance(network_id, balance);
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Change the balance reported for `network_id`
    pub fn set_balance(&self, network_id: &str, balance: Decimal) {
        self.balances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(network_id.to_string(), balance);
    }

    /// Make queries for `network_id` fail (or succeed again)
    pub fn set_failing(&self, network_id: &str, failing: bool) {
        let mut set = self.failing.write().unwrap_or_else(PoisonError::into_inner);
        if failing {
            set.insert(network_id.to_string());
        } else {
            set.remove(network_id);
        }
    }
}

#[async_trait]
impl BalanceOracle for SimulatedBalanceOracle {
    async fn fetch_balance(&self, address: &str, network_id: &str) -> Result<Decimal> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self
            .failing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(network_id)
        {
            return Err(Error::Oracle(format!("{} node unreachable", network_id)));
        }

        let balance = self
            .balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(network_id)
            .copied()
            .unwrap_or(Decimal::ZERO);

        debug!(address, network = network_id, %balance, "simulated balance query");
        Ok(balance)
    }
}
