//! Wallet record held by an authenticated session

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::ValidationError;
use crate::network::Network;

/// Display name given to wallets created by the import flow
pub const IMPORTED_WALLET_NAME: &str = "Imported Wallet";

/// The wallet of the current session.
///
/// `balance` is denominated in `network`'s symbol: the network it was last
/// reconciled against, which can lag the active network until the next
/// reconciliation lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// The wallet's unique identifier
    pub id: String,
    /// The wallet's display name
    pub name: String,
    /// The wallet's address
    pub address: String,
    /// Non-negative balance in `network`'s native asset
    pub balance: Decimal,
    /// Network the balance is denominated in
    pub network: Network,
    /// When the record was installed
    pub created_at: DateTime<Utc>,
}

impl WalletRecord {
    /// The configured canonical wallet, installed by the create and access flows
    pub fn canonical(config: &SessionConfig, network: &Network) -> Self {
        Self {
            id: config.wallet_id.clone(),
            name: config.wallet_name.clone(),
            address: config.wallet_address.clone(),
            balance: config.opening_balance.max(Decimal::ZERO),
            network: network.clone(),
            created_at: Utc::now(),
        }
    }

    /// A wallet for an imported key; its balance is unknown until reconciled
    pub fn imported(address: String, network: &Network) -> Self {
        Self {
            id: format!("wallet-{}", Uuid::new_v4()),
            name: IMPORTED_WALLET_NAME.to_string(),
            address,
            balance: Decimal::ZERO,
            network: network.clone(),
            created_at: Utc::now(),
        }
    }

    /// Debit `amount` locally. Fails, leaving the balance untouched, when
    /// that would go below zero.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        if amount > self.balance {
            return Err(ValidationError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}
