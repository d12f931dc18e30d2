//! Shared helpers for session integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::oneshot;

use nest_wallet::balance::{BalanceOracle, SimulatedBalanceOracle};
use nest_wallet::notify::InMemoryNotifier;
use nest_wallet::{Error, Result, SessionConfig, SessionManager};

/// A secret accepted by the import flow
pub const VALID_SECRET: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// A well-formed EVM recipient
pub const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// Oracle whose answers are handed out by the test, one call at a time
#[derive(Default)]
pub struct ScriptedOracle {
    pending: Mutex<Vec<(String, oneshot::Sender<Result<Decimal>>)>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls still waiting for an answer
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Total calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yield to spawned tasks until `count` calls are waiting
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..10_000 {
            if self.pending() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} pending oracle calls, saw {}", count, self.pending());
    }

    /// Answer the oldest waiting call for `network_id`
    pub fn resolve(&self, network_id: &str, answer: Result<Decimal>) {
        let sender = {
            let mut pending = self.pending.lock().unwrap();
            let index = pending
                .iter()
                .position(|(id, _)| id == network_id)
                .unwrap_or_else(|| panic!("no pending oracle call for {}", network_id));
            pending.remove(index).1
        };
        let _ = sender.send(answer);
    }
}

#[async_trait]
impl BalanceOracle for ScriptedOracle {
    async fn fetch_balance(&self, _address: &str, network_id: &str) -> Result<Decimal> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((network_id.to_string(), tx));
        self.calls.fetch_add(1, Ordering::SeqCst);

        rx.await
            .unwrap_or_else(|_| Err(Error::Oracle("answer dropped".to_string())))
    }
}

/// Wraps the simulated oracle and counts calls
pub struct CountingOracle {
    inner: SimulatedBalanceOracle,
    calls: AtomicUsize,
}

impl CountingOracle {
    pub fn new(inner: SimulatedBalanceOracle) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &SimulatedBalanceOracle {
        &self.inner
    }
}

#[async_trait]
impl BalanceOracle for CountingOracle {
    async fn fetch_balance(&self, address: &str, network_id: &str) -> Result<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_balance(address, network_id).await
    }
}

/// Manager over the demo oracle, plus the notifier it reports to
pub fn demo_manager() -> (SessionManager, Arc<InMemoryNotifier>) {
    let notifier = Arc::new(InMemoryNotifier::new());
    let manager = SessionManager::new(
        SessionConfig::default(),
        Arc::new(SimulatedBalanceOracle::demo()),
        notifier.clone(),
    );
    (manager, notifier)
}

/// Manager over `oracle`, plus the notifier it reports to
pub fn manager_with(oracle: Arc<dyn BalanceOracle>) -> (SessionManager, Arc<InMemoryNotifier>) {
    let notifier = Arc::new(InMemoryNotifier::new());
    let manager = SessionManager::new(SessionConfig::default(), oracle, notifier.clone());
    (manager, notifier)
}
