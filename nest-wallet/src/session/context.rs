//! Session-scoped state owned by a single manager

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::account::{validate_address, WalletRecord};
use crate::crypto::mnemonic::SeedPhrase;
use crate::error::{Error, Result, ValidationError};
use crate::ledger::{Direction, Ledger, NewTransaction, Transaction, TransactionStatus};
use crate::network::NetworkRegistry;
use super::reconcile::ReconcileState;
use super::store::SessionStore;

/// Everything one session manager mutates: registry, store and ledger.
///
/// Mutations are synchronous; callers hold the context lock for the whole
/// of one operation and release it before any await.
#[derive(Debug)]
pub struct SessionContext {
    pub(crate) registry: NetworkRegistry,
    pub(crate) store: SessionStore,
    pub(crate) ledger: Ledger,
    pub(crate) reconcile: ReconcileState,
    /// Set by logout; the next session starts from the seed ledger
    reset_ledger: bool,
}

impl SessionContext {
    pub fn new(registry: NetworkRegistry) -> Self {
        let ledger = Ledger::seeded(registry.default_network(), Utc::now());
        Self {
            registry,
            store: SessionStore::new(),
            ledger,
            reconcile: ReconcileState::default(),
            reset_ledger: false,
        }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Install `wallet` as the authenticated wallet
    pub(crate) fn start_session(&mut self, wallet: WalletRecord, seed_phrase: Option<SeedPhrase>) {
        if self.reset_ledger {
            self.ledger = Ledger::seeded(self.registry.default_network(), Utc::now());
            self.reset_ledger = false;
            debug!("ledger reset to seed history");
        }
        info!(wallet = %wallet.id, address = %wallet.address, "session started");
        self.store.install(wallet, seed_phrase);
    }

    /// Drop the authenticated wallet and invalidate in-flight reconciliations
    pub(crate) fn end_session(&mut self) {
        self.store.clear();
        self.reconcile.invalidate();
        self.reset_ledger = true;
        info!("session ended");
    }

    /// Current balance, zero when logged out
    pub fn balance(&self) -> Decimal {
        self.store.wallet().map(|w| w.balance).unwrap_or(Decimal::ZERO)
    }

    /// Validate and record an outgoing transfer, debiting the balance locally.
    ///
    /// The balance only bounds a send once it has been reconciled against the
    /// active network; until then it is denominated in another asset.
    pub(crate) fn record_send(&mut self, to: &str, amount: Decimal) -> Result<Transaction> {
        let wallet = self.store.wallet_mut().ok_or(Error::NotAuthenticated)?;
        let network = self.registry.active();

        if !validate_address(to, network.key_type) {
            return Err(ValidationError::MalformedRecipient {
                address: to.to_string(),
                network: network.id.clone(),
            }
            .into());
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }
        if wallet.network.id != network.id {
            debug!(balance_network = %wallet.network.id, active = %network.id, "send before reconciliation");
            return Err(ValidationError::BalanceNotReconciled {
                network: network.id.clone(),
            }
            .into());
        }
        wallet.debit(amount)?;

        let transaction = self
            .ledger
            .record(NewTransaction {
                direction: Direction::Send,
                amount,
                counterparty_address: to.to_string(),
                timestamp: Utc::now(),
                status: TransactionStatus::Completed,
                network: network.clone(),
            })?
            .clone();
        Ok(transaction)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(NetworkRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::ledger::SEED_COUNTERPARTY;

    fn authenticated() -> SessionContext {
        let mut ctx = SessionContext::default();
        let wallet = WalletRecord::canonical(&SessionConfig::default(), ctx.registry.active());
        ctx.start_session(wallet, None);
        ctx
    }

    #[test]
    fn test_record_send_debits_and_prepends() {
        let mut ctx = authenticated();

        let tx = ctx.record_send(SEED_COUNTERPARTY, Decimal::new(1, 1)).unwrap();

        assert_eq!(tx.id, "tx-5");
        assert_eq!(tx.direction, Direction::Send);
        assert_eq!(ctx.ledger.get(0).unwrap().id, "tx-5");
        assert_eq!(ctx.balance(), Decimal::new(24438, 4));
    }

    #[test]
    fn test_record_send_rejections_change_nothing() {
        let mut ctx = authenticated();

        let cases = [
            ("0xnot-an-address", Decimal::ONE),
            (SEED_COUNTERPARTY, Decimal::ZERO),
            (SEED_COUNTERPARTY, Decimal::new(-5, 1)),
            (SEED_COUNTERPARTY, Decimal::new(3, 0)),
        ];
        for (to, amount) in cases {
            assert!(matches!(ctx.record_send(to, amount), Err(Error::Validation(_))));
        }

        assert_eq!(ctx.ledger.len(), 4);
        assert_eq!(ctx.balance(), Decimal::new(25438, 4));
    }

    #[test]
    fn test_record_send_rejects_unreconciled_balance() {
        let mut ctx = authenticated();
        ctx.registry.set_active("polygon");

        let err = ctx.record_send(SEED_COUNTERPARTY, Decimal::new(1, 1)).unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::BalanceNotReconciled { ref network }) if network == "polygon"
        ));
        assert_eq!(ctx.ledger.len(), 4);
        assert_eq!(ctx.balance(), Decimal::new(25438, 4));
    }

    #[test]
    fn test_record_send_requires_session() {
        let mut ctx = SessionContext::default();
        assert!(matches!(
            ctx.record_send(SEED_COUNTERPARTY, Decimal::ONE),
            Err(Error::NotAuthenticated)
        ));
    }

    #[test]
    fn test_ledger_reset_only_after_logout() {
        let mut ctx = authenticated();
        ctx.record_send(SEED_COUNTERPARTY, Decimal::new(1, 1)).unwrap();

        // Re-authenticating without logout keeps the history
        let wallet = WalletRecord::canonical(&SessionConfig::default(), ctx.registry.active());
        ctx.start_session(wallet, None);
        assert_eq!(ctx.ledger.len(), 5);

        // Logout keeps the history until the next session starts
        ctx.end_session();
        assert_eq!(ctx.ledger.len(), 5);
        assert_eq!(ctx.balance(), Decimal::ZERO);

        let wallet = WalletRecord::canonical(&SessionConfig::default(), ctx.registry.active());
        ctx.start_session(wallet, None);
        assert_eq!(ctx.ledger.len(), 4);
        assert_eq!(ctx.ledger.get(0).unwrap().id, "tx-1");
    }
}
