//! Session configuration from environment variables
//!
//! Every field has a default so a bare environment yields a working demo
//! session. Values that fail to parse are logged and replaced by the default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::warn;

use crate::crypto::mnemonic::BIP39_WORD_COUNTS;
use crate::error::{Error, Result};

/// Which word source backs freshly created seed phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedWordlist {
    /// The 66-word demo list with non-cryptographic randomness
    #[default]
    Demo,
    /// The full BIP-39 English list with OS entropy
    Bip39,
}

impl FromStr for SeedWordlist {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" | "" => Ok(Self::Demo),
            "bip39" => Ok(Self::Bip39),
            other => Err(format!("unknown seed wordlist '{}'", other)),
        }
    }
}

/// How the session manager checks passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    /// Accept every password. Development only
    #[default]
    None,
    /// bcrypt hash enrolled by create/import, verified by access
    HashedPassword,
}

impl FromStr for CredentialMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "password" | "hashed-password" => Ok(Self::HashedPassword),
            other => Err(format!("unknown credential mode '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Credential check installed by the session manager
    pub credential_mode: CredentialMode,
    /// Minimum password length enforced when a credential is enrolled
    pub min_password_len: usize,
    /// Number of words in a generated seed phrase
    pub seed_phrase_words: usize,
    /// Word source for generated seed phrases
    pub seed_wordlist: SeedWordlist,
    /// Identifier of the canonical wallet installed by create/access
    pub wallet_id: String,
    /// Display name of the canonical wallet
    pub wallet_name: String,
    /// Address of the canonical wallet
    pub wallet_address: String,
    /// Balance shown before the first reconciliation completes
    pub opening_balance: Decimal,
    /// Upper bound on a single balance oracle call
    pub oracle_timeout: Duration,
    /// Remote network catalog, if any
    pub network_source_url: Option<String>,
    /// bcrypt work factor for hashed-password credentials
    pub bcrypt_cost: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credential_mode: CredentialMode::None,
            min_password_len: 8,
            seed_phrase_words: 12,
            seed_wordlist: SeedWordlist::Demo,
            wallet_id: "wallet-1".to_string(),
            wallet_name: "Main Wallet".to_string(),
            wallet_address: "0x71C7656EC7ab88b098defB751B7401B5f6d8976F".to_string(),
            opening_balance: Decimal::new(25438, 4),
            oracle_timeout: Duration::from_secs(10),
            network_source_url: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `NEST_CREDENTIALS`: "none" (default) or "password"
    /// - `NEST_MIN_PASSWORD_LEN`: minimum password length (default 8)
    /// - `NEST_SEED_PHRASE_WORDS`: seed phrase length (default 12)
    /// - `NEST_SEED_WORDLIST`: "demo" (default) or "bip39"
    /// - `NEST_WALLET_ADDRESS`: canonical wallet address
    /// - `NEST_OPENING_BALANCE`: balance shown before the first refresh
    /// - `NEST_ORACLE_TIMEOUT_SECS`: balance query timeout (default 10)
    /// - `NEST_NETWORK_SOURCE_URL`: remote network catalog (optional)
    /// - `NEST_BCRYPT_COST`: bcrypt work factor
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            credential_mode: parse_var("NEST_CREDENTIALS", defaults.credential_mode),
            min_password_len: parse_var("NEST_MIN_PASSWORD_LEN", defaults.min_password_len),
            seed_phrase_words: parse_var("NEST_SEED_PHRASE_WORDS", defaults.seed_phrase_words),
            seed_wordlist: parse_var("NEST_SEED_WORDLIST", defaults.seed_wordlist),
            wallet_address: env::var("NEST_WALLET_ADDRESS").unwrap_or(defaults.wallet_address),
            opening_balance: parse_var("NEST_OPENING_BALANCE", defaults.opening_balance),
            oracle_timeout: Duration::from_secs(parse_var(
                "NEST_ORACLE_TIMEOUT_SECS",
                defaults.oracle_timeout.as_secs(),
            )),
            network_source_url: env::var("NEST_NETWORK_SOURCE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            bcrypt_cost: parse_var("NEST_BCRYPT_COST", defaults.bcrypt_cost),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations no session can run with
    pub fn validate(&self) -> Result<()> {
        if self.seed_phrase_words == 0 {
            return Err(Error::Config("seed phrase needs at least one word".to_string()));
        }
        if self.seed_wordlist == SeedWordlist::Bip39
            && !BIP39_WORD_COUNTS.contains(&self.seed_phrase_words)
        {
            return Err(Error::Config(format!(
                "BIP-39 phrases have 12, 15, 18, 21 or 24 words, not {}",
                self.seed_phrase_words
            )));
        }
        if self.oracle_timeout.is_zero() {
            return Err(Error::Config("oracle timeout must be non-zero".to_string()));
        }
        if self.opening_balance < Decimal::ZERO {
            return Err(Error::Config(format!(
                "opening balance {} is negative",
                self.opening_balance
            )));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(Error::Config(format!(
                "bcrypt cost {} outside 4..=31",
                self.bcrypt_cost
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warn!(variable = name, error = %e, "ignoring unparseable value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();

        assert_eq!(config.min_password_len, 8);
        assert_eq!(config.seed_phrase_words, 12);
        assert_eq!(config.opening_balance.to_string(), "2.5438");
        assert_eq!(config.seed_wordlist, SeedWordlist::Demo);
        assert!(config.network_source_url.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(SessionConfig::default().validate().is_ok());

        let config = SessionConfig {
            oracle_timeout: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = SessionConfig {
            opening_balance: Decimal::new(-1, 0),
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = SessionConfig {
            bcrypt_cost: 2,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            seed_wordlist: SeedWordlist::Bip39,
            seed_phrase_words: 13,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = SessionConfig {
            seed_wordlist: SeedWordlist::Bip39,
            seed_phrase_words: 24,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_ok());

        // The demo list has no length restriction
        let config = SessionConfig {
            seed_phrase_words: 13,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seed_wordlist_parse() {
        assert_eq!("bip39".parse::<SeedWordlist>().unwrap(), SeedWordlist::Bip39);
        assert_eq!("DEMO".parse::<SeedWordlist>().unwrap(), SeedWordlist::Demo);
        assert!("diceware".parse::<SeedWordlist>().is_err());
    }

    #[test]
    fn test_credential_mode_parse() {
        assert_eq!("password".parse::<CredentialMode>().unwrap(), CredentialMode::HashedPassword);
        assert_eq!("None".parse::<CredentialMode>().unwrap(), CredentialMode::None);
        assert!("fingerprint".parse::<CredentialMode>().is_err());
        assert_eq!(SessionConfig::default().credential_mode, CredentialMode::None);
    }

    #[test]
    fn test_parse_var_falls_back() {
        std::env::set_var("NEST_TEST_PARSE_VAR", "not-a-number");
        assert_eq!(parse_var("NEST_TEST_PARSE_VAR", 7usize), 7);

        std::env::set_var("NEST_TEST_PARSE_VAR", "42");
        assert_eq!(parse_var("NEST_TEST_PARSE_VAR", 7usize), 42);
        std::env::remove_var("NEST_TEST_PARSE_VAR");
    }
}
