//! Balance oracles
//!
//! An oracle answers "what is the balance of this address on this network".
//! The session manager calls it after every context change and reconciles
//! the answer with its local, optimistically updated balance.

mod simulated;
#[cfg(feature = "ethereum")]
mod evm;

pub use simulated::*;
#[cfg(feature = "ethereum")]
pub use evm::*;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;

/// Maps (address, network id) to a balance in the network's native asset
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Query the balance; fails with [`crate::Error::Oracle`] on transport errors
    async fn fetch_balance(&self, address: &str, network_id: &str) -> Result<Decimal>;
}
