//! Balance reconciliation against the oracle
//!
//! Each request is stamped with an epoch when it begins. The response is
//! applied only if no newer request started in the meantime and the wallet
//! still sits on the same address and active network; anything else is
//! discarded on arrival.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::balance::BalanceOracle;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::notify::{Notifier, Severity};
use super::context::SessionContext;

/// Epoch counter and loading flag
#[derive(Debug, Default)]
pub struct ReconcileState {
    epoch: u64,
    /// Epoch of the request a caller is waiting on, if any
    loading: Option<u64>,
}

impl ReconcileState {
    /// Whether a reconciliation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Current epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.loading = Some(self.epoch);
        self.epoch
    }

    fn settle(&mut self, epoch: u64) {
        if self.loading == Some(epoch) {
            self.loading = None;
        }
    }

    /// Make every in-flight request stale
    pub(crate) fn invalidate(&mut self) {
        self.epoch += 1;
        self.loading = None;
    }
}

/// Snapshot of what a reconciliation asks the oracle about
#[derive(Debug, Clone)]
pub(crate) struct ReconcileRequest {
    pub epoch: u64,
    pub address: String,
    pub network: Network,
}

/// How a reconciliation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The oracle balance was written to the wallet record
    Applied { network_id: String, balance: Decimal },
    /// The response arrived after the context moved on and was dropped
    Discarded,
    /// The oracle failed; the prior balance was kept
    Failed(String),
    /// Nothing to reconcile: no wallet, or no runtime to run on
    Skipped,
}

impl SessionContext {
    /// Start a reconciliation for the current wallet and active network.
    /// Returns `None` when no wallet is installed.
    pub(crate) fn begin_reconcile(&mut self) -> Option<ReconcileRequest> {
        let address = self.store.wallet()?.address.clone();
        let network = self.registry.active().clone();
        let epoch = self.reconcile.begin();

        debug!(epoch, address = %address, network = %network.id, "reconciliation started");
        Some(ReconcileRequest {
            epoch,
            address,
            network,
        })
    }

    /// Apply an oracle response if it is still relevant
    pub(crate) fn finish_reconcile(
        &mut self,
        request: &ReconcileRequest,
        result: Result<Decimal>,
    ) -> ReconcileOutcome {
        self.reconcile.settle(request.epoch);

        let current = request.epoch == self.reconcile.epoch
            && self.registry.active().id == request.network.id;
        let wallet = match self.store.wallet_mut() {
            Some(wallet) if current && wallet.address == request.address => wallet,
            _ => {
                debug!(epoch = request.epoch, network = %request.network.id, "discarding stale oracle response");
                return ReconcileOutcome::Discarded;
            }
        };

        match result {
            Ok(balance) if balance >= Decimal::ZERO => {
                wallet.balance = balance;
                wallet.network = request.network.clone();
                info!(network = %request.network.id, balance = %balance, "balance reconciled");
                ReconcileOutcome::Applied {
                    network_id: request.network.id.clone(),
                    balance,
                }
            }
            Ok(balance) => {
                warn!(network = %request.network.id, balance = %balance, "oracle returned a negative balance");
                ReconcileOutcome::Failed(format!("negative balance {}", balance))
            }
            Err(e) => {
                warn!(network = %request.network.id, error = %e, "balance refresh failed");
                ReconcileOutcome::Failed(e.to_string())
            }
        }
    }

    /// Drop a request that will never reach the oracle
    pub(crate) fn abandon_reconcile(&mut self, request: &ReconcileRequest) {
        self.reconcile.settle(request.epoch);
    }
}

/// Query the oracle for `request` and reconcile the answer into `context`.
///
/// The context lock is only taken after the oracle call completes.
pub(crate) async fn run(
    context: Arc<Mutex<SessionContext>>,
    oracle: Arc<dyn BalanceOracle>,
    notifier: Arc<dyn Notifier>,
    request: ReconcileRequest,
    timeout: Duration,
) -> ReconcileOutcome {
    let result = tokio::time::timeout(
        timeout,
        oracle.fetch_balance(&request.address, &request.network.id),
    )
    .await
    .unwrap_or_else(|_| {
        Err(Error::Oracle(format!(
            "no response from {} within {:?}",
            request.network.display_name, timeout
        )))
    });

    let outcome = context
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .finish_reconcile(&request, result);

    if let ReconcileOutcome::Failed(reason) = &outcome {
        notifier.emit("Balance Refresh Failed", reason, Severity::Error);
    }
    outcome
}
