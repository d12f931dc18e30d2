//! Supported blockchain networks
//!
//! This module holds the network description, the registry that tracks which
//! network is active, and the sources a registry can be refreshed from.

mod registry;
mod source;

pub use registry::*;
pub use source::*;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::KeyType;

/// A blockchain network the wallet can operate on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Unique registry key
    pub id: String,
    /// Human readable name
    pub display_name: String,
    /// Native asset symbol balances are denominated in
    pub symbol: String,
    /// Icon reference for display
    pub icon_ref: String,
    /// Chain identifier as published by the network
    pub chain_id: String,
    /// JSON-RPC endpoint
    pub rpc_endpoint: String,
    /// Whether this network starts out active
    #[serde(default)]
    pub is_default_active: bool,
    /// Address family used on this network
    #[serde(default)]
    pub key_type: KeyType,
}

/// The networks available before any refresh
pub fn builtin_networks() -> Vec<Network> {
    vec![
        Network {
            id: "ethereum".to_string(),
            display_name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            icon_ref: "🔷".to_string(),
            chain_id: "1".to_string(),
            rpc_endpoint: "https://mainnet.infura.io/v3/your-project-id".to_string(),
            is_default_active: true,
            key_type: KeyType::Ethereum,
        },
        Network {
            id: "binance".to_string(),
            display_name: "Binance Smart Chain".to_string(),
            symbol: "BNB".to_string(),
            icon_ref: "🟡".to_string(),
            chain_id: "56".to_string(),
            rpc_endpoint: "https://bsc-dataseed.binance.org/".to_string(),
            is_default_active: false,
            key_type: KeyType::Ethereum,
        },
        Network {
            id: "polygon".to_string(),
            display_name: "Polygon".to_string(),
            symbol: "MATIC".to_string(),
            icon_ref: "🟣".to_string(),
            chain_id: "137".to_string(),
            rpc_endpoint: "https://polygon-rpc.com/".to_string(),
            is_default_active: false,
            key_type: KeyType::Ethereum,
        },
        Network {
            id: "solana".to_string(),
            display_name: "Solana".to_string(),
            symbol: "SOL".to_string(),
            icon_ref: "🟪".to_string(),
            chain_id: "1".to_string(),
            rpc_endpoint: "https://api.mainnet-beta.solana.com".to_string(),
            is_default_active: false,
            key_type: KeyType::Solana,
        },
    ]
}
