//! Session manager: the public operations of the wallet core

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::account::{truncate_address, WalletRecord};
use crate::balance::BalanceOracle;
use crate::config::{CredentialMode, SeedWordlist, SessionConfig};
use crate::crypto::credentials::{CredentialVerifier, HashedPasswordVerifier, NoVerification};
use crate::crypto::keys::{ImportSecret, KeyDeriver, SubstringKeyDeriver};
use crate::crypto::mnemonic::{Bip39Generator, DemoWordlistGenerator, SeedPhrase, SeedPhraseGenerator};
use crate::error::{Error, Result};
use crate::ledger::Transaction;
use crate::network::{HttpNetworkSource, Network, NetworkRegistry, NetworkSource, StaticNetworkSource};
use crate::notify::{Notifier, Severity};
use super::context::SessionContext;
use super::reconcile::{self, ReconcileOutcome};

/// What a successful create, access or import hands back
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub wallet: WalletRecord,
    /// Only the create flow produces a seed phrase
    pub seed_phrase: Option<SeedPhrase>,
}

/// Owns one session context and the collaborators it talks to.
///
/// Every operation mutates the context synchronously under its lock. Balance
/// reconciliations triggered by those operations are spawned on the ambient
/// Tokio runtime and re-enter the context only once the oracle has answered.
pub struct SessionManager {
    config: SessionConfig,
    context: Arc<Mutex<SessionContext>>,
    oracle: Arc<dyn BalanceOracle>,
    notifier: Arc<dyn Notifier>,
    credentials: Arc<dyn CredentialVerifier>,
    key_deriver: Arc<dyn KeyDeriver>,
    seed_generator: Arc<dyn SeedPhraseGenerator>,
    network_source: Arc<dyn NetworkSource>,
    pending: Mutex<Vec<JoinHandle<ReconcileOutcome>>>,
}

impl SessionManager {
    /// Create a manager over the built-in networks.
    ///
    /// The credential check follows `config.credential_mode`; any other
    /// verifier can be installed with [`SessionManager::with_credentials`].
    pub fn new(
        config: SessionConfig,
        oracle: Arc<dyn BalanceOracle>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let credentials: Arc<dyn CredentialVerifier> = match config.credential_mode {
            CredentialMode::None => {
                warn!("session manager created without a credential verifier; passwords are not checked");
                Arc::new(NoVerification)
            }
            CredentialMode::HashedPassword => Arc::new(HashedPasswordVerifier::new(
                config.bcrypt_cost,
                config.min_password_len,
            )),
        };
        let seed_generator: Arc<dyn SeedPhraseGenerator> = match config.seed_wordlist {
            SeedWordlist::Demo => Arc::new(DemoWordlistGenerator),
            SeedWordlist::Bip39 => Arc::new(Bip39Generator),
        };
        let network_source: Arc<dyn NetworkSource> = match &config.network_source_url {
            Some(url) => Arc::new(HttpNetworkSource::new(url.clone(), config.oracle_timeout)),
            None => Arc::new(StaticNetworkSource::default()),
        };

        Self {
            context: Arc::new(Mutex::new(SessionContext::new(NetworkRegistry::builtin()))),
            oracle,
            notifier,
            credentials,
            key_deriver: Arc::new(SubstringKeyDeriver),
            seed_generator,
            network_source,
            pending: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_key_deriver(mut self, key_deriver: Arc<dyn KeyDeriver>) -> Self {
        self.key_deriver = key_deriver;
        self
    }

    pub fn with_seed_generator(mut self, seed_generator: Arc<dyn SeedPhraseGenerator>) -> Self {
        self.seed_generator = seed_generator;
        self
    }

    pub fn with_network_source(mut self, network_source: Arc<dyn NetworkSource>) -> Self {
        self.network_source = network_source;
        self
    }

    /// Start from `registry` instead of the built-in networks
    pub fn with_registry(self, registry: NetworkRegistry) -> Self {
        *self.lock() = SessionContext::new(registry);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Authentication

    /// Create a new wallet: enroll `password`, generate a seed phrase and
    /// install the canonical wallet on the active network.
    pub fn create_session(&self, password: &str) -> Result<SessionResult> {
        let seed_phrase = self.seed_generator.generate(self.config.seed_phrase_words)?;
        if !self.seed_generator.is_secure() {
            warn!("seed phrase is not backed by secure entropy");
        }
        self.credentials.enroll(password)?;

        let result = self.install(
            |network| WalletRecord::canonical(&self.config, network),
            Some(seed_phrase),
        );
        self.notifier.emit(
            "Wallet Created",
            "Your wallet has been created successfully!",
            Severity::Info,
        );
        Ok(result)
    }

    /// Unlock the canonical wallet after checking `password`
    pub fn access_session(&self, password: &str) -> Result<SessionResult> {
        self.credentials.verify(password).map_err(|e| {
            warn!(error = %e, "wallet access denied");
            e
        })?;

        let result = self.install(|network| WalletRecord::canonical(&self.config, network), None);
        self.notifier.emit("Wallet Accessed", "Welcome back!", Severity::Info);
        Ok(result)
    }

    /// Import a wallet from a hex-encoded private key.
    ///
    /// A malformed secret is rejected before any state changes.
    pub fn import_session(&self, secret: &str, password: &str) -> Result<SessionResult> {
        let secret = ImportSecret::parse(secret)?;
        let address = self.key_deriver.derive_address(&secret)?;
        self.credentials.enroll(password)?;

        let result = self.install(|network| WalletRecord::imported(address, network), None);
        self.notifier.emit(
            "Wallet Imported",
            "Your wallet has been imported successfully!",
            Severity::Info,
        );
        Ok(result)
    }

    fn install<F>(&self, build: F, seed_phrase: Option<SeedPhrase>) -> SessionResult
    where
        F: FnOnce(&Network) -> WalletRecord,
    {
        let wallet = {
            let mut ctx = self.lock();
            let wallet = build(ctx.registry.active());
            ctx.start_session(wallet.clone(), seed_phrase.clone());
            wallet
        };
        self.schedule_reconcile();
        SessionResult {
            wallet,
            seed_phrase,
        }
    }

    /// End the session. The ledger and registry survive until the next
    /// session starts, which begins again from the seed ledger.
    pub fn logout(&self) {
        self.lock().end_session();
        self.notifier.emit("Logged Out", "You have been logged out.", Severity::Info);
    }

    // Networks

    pub fn list_networks(&self) -> Vec<Network> {
        self.lock().registry.networks().to_vec()
    }

    /// Replace the registry from the network source.
    ///
    /// Returns whether the active network had to change. When the previously
    /// active network is gone the first network of the new set takes over and
    /// the balance is reconciled against it.
    pub async fn refresh_networks(&self) -> Result<bool> {
        if !self.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }

        let networks = self.network_source.fetch().await.map_err(|e| {
            warn!(error = %e, "network refresh failed; keeping current registry");
            e
        })?;

        let change = {
            let mut ctx = self.lock();
            if !ctx.store.is_authenticated() {
                return Err(Error::NotAuthenticated);
            }
            ctx.registry.replace(networks)?
        };

        if change.active_changed() {
            self.notifier.emit(
                "Network Unavailable",
                &format!(
                    "{} is no longer available. Switched to {}",
                    change.previous.display_name, change.active.display_name
                ),
                Severity::Warning,
            );
            self.schedule_reconcile();
        }
        Ok(change.active_changed())
    }

    /// Make `network_id` active. Returns false, changing nothing, when it is
    /// not registered. Switching to the active network still reconciles.
    pub fn switch_network(&self, network_id: &str) -> bool {
        let name = {
            let mut ctx = self.lock();
            if !ctx.registry.set_active(network_id) {
                debug!(error = %Error::NetworkNotFound(network_id.to_string()), "ignoring network switch");
                return false;
            }
            ctx.registry.active().display_name.clone()
        };

        info!(network = network_id, "switched network");
        self.notifier.emit("Network Switched", &format!("Switched to {}", name), Severity::Info);
        self.schedule_reconcile();
        true
    }

    // Ledger and balance

    /// Send `amount` of the active network's asset to `to`.
    ///
    /// The balance is debited locally right away and corrected by the
    /// reconciliation that follows.
    pub fn send_transaction(&self, to: &str, amount: Decimal) -> Result<Transaction> {
        let transaction = self.lock().record_send(to, amount).map_err(|e| {
            debug!(error = %e, "send rejected");
            e
        })?;

        info!(id = %transaction.id, amount = %amount, network = %transaction.network.id, "transaction sent");
        self.notifier.emit(
            "Transaction Sent",
            &format!(
                "Sent {} {} to {}",
                amount,
                transaction.network.symbol,
                truncate_address(to)
            ),
            Severity::Info,
        );
        self.schedule_reconcile();
        Ok(transaction)
    }

    /// Current balance, zero when logged out
    pub fn get_balance(&self) -> Decimal {
        self.lock().balance()
    }

    /// Reconcile the balance now and wait for the result
    pub async fn refresh_balance(&self) -> ReconcileOutcome {
        let request = self.lock().begin_reconcile();
        match request {
            Some(request) => {
                reconcile::run(
                    self.context.clone(),
                    self.oracle.clone(),
                    self.notifier.clone(),
                    request,
                    self.config.oracle_timeout,
                )
                .await
            }
            None => ReconcileOutcome::Skipped,
        }
    }

    /// Wait for every scheduled reconciliation still running
    pub async fn settle(&self) -> Vec<ReconcileOutcome> {
        let handles = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!(error = %e, "reconciliation task did not complete"),
            }
        }
        outcomes
    }

    fn schedule_reconcile(&self) {
        let request = self.lock().begin_reconcile();
        let Some(request) = request else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let task = handle.spawn(reconcile::run(
                    self.context.clone(),
                    self.oracle.clone(),
                    self.notifier.clone(),
                    request,
                    self.config.oracle_timeout,
                ));
                let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
                pending.retain(|h| !h.is_finished());
                pending.push(task);
            }
            Err(_) => {
                warn!(network = %request.network.id, "no async runtime; skipping balance reconciliation");
                self.lock().abandon_reconcile(&request);
            }
        }
    }

    // Snapshots

    pub fn is_authenticated(&self) -> bool {
        self.lock().store.is_authenticated()
    }

    pub fn wallet(&self) -> Option<WalletRecord> {
        self.lock().store.wallet().cloned()
    }

    pub fn seed_phrase(&self) -> Option<SeedPhrase> {
        self.lock().store.seed_phrase().cloned()
    }

    pub fn active_network(&self) -> Network {
        self.lock().registry.active().clone()
    }

    /// Ledger entries, newest first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().ledger.entries().cloned().collect()
    }

    pub fn transactions_for_network(&self, network_id: &str) -> Vec<Transaction> {
        self.lock().ledger.for_network(network_id).cloned().collect()
    }

    /// Whether a balance reconciliation is in flight
    pub fn is_loading(&self) -> bool {
        self.lock().reconcile.is_loading()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::SimulatedBalanceOracle;
    use crate::notify::InMemoryNotifier;

    fn manager() -> (SessionManager, Arc<InMemoryNotifier>) {
        let notifier = Arc::new(InMemoryNotifier::new());
        let manager = SessionManager::new(
            SessionConfig::default(),
            Arc::new(SimulatedBalanceOracle::demo()),
            notifier.clone(),
        );
        (manager, notifier)
    }

    #[test]
    fn test_without_runtime_skips_reconcile() {
        let (manager, _) = manager();

        manager.access_session("password123").unwrap();

        assert!(manager.is_authenticated());
        assert!(!manager.is_loading());
        assert_eq!(manager.get_balance(), Decimal::new(25438, 4));
    }

    #[tokio::test]
    async fn test_create_session_reconciles() {
        let (manager, notifier) = manager();

        let result = manager.create_session("password123").unwrap();
        assert_eq!(result.seed_phrase.as_ref().map(|p| p.len()), Some(12));
        assert!(manager.is_loading());

        let outcomes = manager.settle().await;
        assert_eq!(outcomes.len(), 1);
        assert!(!manager.is_loading());
        assert_eq!(notifier.titles(), ["Wallet Created"]);
    }

    #[tokio::test]
    async fn test_refresh_balance_when_logged_out() {
        let (manager, _) = manager();
        assert_eq!(manager.refresh_balance().await, ReconcileOutcome::Skipped);
    }
}
