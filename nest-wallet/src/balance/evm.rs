//! EVM JSON-RPC balance oracle

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::Address;
use ethers::utils::format_units;
use rust_decimal::Decimal;
use tracing::debug;

use crate::crypto::keys::KeyType;
use crate::error::{Error, Result};
use crate::network::Network;
use super::BalanceOracle;

/// Queries `eth_getBalance` on each network's RPC endpoint
pub struct EvmRpcBalanceOracle {
    providers: HashMap<String, Provider<Http>>,
}

impl EvmRpcBalanceOracle {
    /// Build providers for every EVM network in `networks`; others are skipped
    pub fn from_networks(networks: &[Network]) -> Result<Self> {
        let mut providers = HashMap::new();
        for network in networks.iter().filter(|n| n.key_type == KeyType::Ethereum) {
            let provider = Provider::<Http>::try_from(network.rpc_endpoint.as_str())
                .map_err(|e| Error::Oracle(format!("Failed to create provider for {}: {}", network.id, e)))?;
            providers.insert(network.id.clone(), provider);
        }
        Ok(Self { providers })
    }

    /// Whether `network_id` can be queried
    pub fn supports(&self, network_id: &str) -> bool {
        self.providers.contains_key(network_id)
    }
}

#[async_trait]
impl BalanceOracle for EvmRpcBalanceOracle {
    async fn fetch_balance(&self, address: &str, network_id: &str) -> Result<Decimal> {
        let provider = self
            .providers
            .get(network_id)
            .ok_or_else(|| Error::Oracle(format!("No EVM endpoint for network {}", network_id)))?;

        let address = Address::from_str(address)
            .map_err(|e| Error::Oracle(format!("Invalid address: {}", e)))?;

        let wei = provider
            .get_balance(address, None)
            .await
            .map_err(|e| Error::Oracle(format!("Failed to get balance: {}", e)))?;

        // ETH, BNB and MATIC all use 18 decimals
        let formatted = format_units(wei, "ether")
            .map_err(|e| Error::Oracle(format!("Failed to convert balance: {}", e)))?;

        debug!(network = network_id, balance = %formatted, "rpc balance query");
        Decimal::from_str(&formatted)
            .map(|d| d.normalize())
            .map_err(|e| Error::Oracle(format!("Balance out of range: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::builtin_networks;

    #[test]
    fn test_only_evm_networks_get_providers() {
        let oracle = EvmRpcBalanceOracle::from_networks(&builtin_networks()).unwrap();

        assert!(oracle.supports("ethereum"));
        assert!(oracle.supports("binance"));
        assert!(oracle.supports("polygon"));
        assert!(!oracle.supports("solana"));
    }

    #[tokio::test]
    async fn test_unsupported_network_is_an_oracle_error() {
        let oracle = EvmRpcBalanceOracle::from_networks(&builtin_networks()).unwrap();
        let result = oracle
            .fetch_balance("0x742d35Cc6634C0532925a3b844Bc454e4438f44e", "solana")
            .await;
        assert!(matches!(result, Err(Error::Oracle(_))));
    }
}
