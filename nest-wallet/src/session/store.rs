//! Authentication state of a session

use crate::account::WalletRecord;
use crate::crypto::mnemonic::SeedPhrase;

/// Holds the wallet record and the one-time seed phrase.
///
/// A session is authenticated exactly when a wallet record is present.
#[derive(Debug, Default)]
pub struct SessionStore {
    wallet: Option<WalletRecord>,
    seed_phrase: Option<SeedPhrase>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn wallet(&self) -> Option<&WalletRecord> {
        self.wallet.as_ref()
    }

    pub fn wallet_mut(&mut self) -> Option<&mut WalletRecord> {
        self.wallet.as_mut()
    }

    /// The seed phrase produced by the create flow, if this session has one
    pub fn seed_phrase(&self) -> Option<&SeedPhrase> {
        self.seed_phrase.as_ref()
    }

    /// Authenticate with `wallet`. Any earlier seed phrase is replaced, so only
    /// the create flow leaves one behind.
    pub fn install(&mut self, wallet: WalletRecord, seed_phrase: Option<SeedPhrase>) {
        self.wallet = Some(wallet);
        self.seed_phrase = seed_phrase;
    }

    /// Drop the wallet, the seed phrase and with them the authentication
    pub fn clear(&mut self) {
        self.wallet = None;
        self.seed_phrase = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::network::builtin_networks;

    #[test]
    fn test_install_and_clear() {
        let mut store = SessionStore::new();
        assert!(!store.is_authenticated());

        let wallet = WalletRecord::canonical(&SessionConfig::default(), &builtin_networks()[0]);
        store.install(wallet, Some(SeedPhrase::new(["abandon"; 12])));
        assert!(store.is_authenticated());
        assert_eq!(store.seed_phrase().map(|p| p.len()), Some(12));

        let wallet = WalletRecord::canonical(&SessionConfig::default(), &builtin_networks()[0]);
        store.install(wallet, None);
        assert!(store.seed_phrase().is_none());

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.wallet().is_none());
    }
}
