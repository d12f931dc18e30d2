//! Common key derivation functionality

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Address families understood by the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Ethereum and EVM compatible chains
    #[default]
    Ethereum,
    /// Solana
    Solana,
}

/// Total length of an import secret, prefix included
pub const IMPORT_SECRET_LEN: usize = 66;

/// A private key supplied by the import flow: `0x` followed by 64 ASCII
/// characters.
///
/// Only the prefix, length and character set are checked here; derivers that
/// need real hex reject anything else themselves. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ImportSecret(String);

impl ImportSecret {
    /// Check the shape of `secret` and wrap it
    pub fn parse(secret: &str) -> std::result::Result<Self, ValidationError> {
        if !secret.starts_with("0x") || !secret.is_ascii() || secret.len() != IMPORT_SECRET_LEN {
            return Err(ValidationError::MalformedSecret);
        }
        Ok(Self(secret.to_string()))
    }

    /// The full secret, prefix included
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The 64 characters after the `0x` prefix
    pub fn body(&self) -> &str {
        &self.0[2..]
    }
}

impl fmt::Debug for ImportSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImportSecret([REDACTED])")
    }
}

/// Derives the display address of an imported wallet
pub trait KeyDeriver: Send + Sync {
    /// Deterministically map `secret` to an address
    fn derive_address(&self, secret: &ImportSecret) -> Result<String>;
}

/// Placeholder derivation: `0x` followed by the last 40 characters of the secret.
///
/// Deterministic but has nothing to do with the key's real public address.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringKeyDeriver;

impl KeyDeriver for SubstringKeyDeriver {
    fn derive_address(&self, secret: &ImportSecret) -> Result<String> {
        let tail: String = secret.body().chars().skip(24).collect();
        Ok(format!("0x{}", tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_parse_import_secret() {
        assert!(ImportSecret::parse(SECRET).is_ok());
        assert_eq!(ImportSecret::parse(&SECRET[2..]), Err(ValidationError::MalformedSecret));
        assert_eq!(ImportSecret::parse(&SECRET[..65]), Err(ValidationError::MalformedSecret));
        assert_eq!(ImportSecret::parse(""), Err(ValidationError::MalformedSecret));
        assert_eq!(
            ImportSecret::parse(&format!("0X{}", &SECRET[2..])),
            Err(ValidationError::MalformedSecret)
        );
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        // 66 characters, but the last two are multi-byte
        let secret = format!("{}éé", &SECRET[..64]);
        assert_eq!(secret.chars().count(), IMPORT_SECRET_LEN);
        assert_eq!(ImportSecret::parse(&secret), Err(ValidationError::MalformedSecret));
    }

    #[test]
    fn test_substring_derivation() {
        let secret = ImportSecret::parse(SECRET).unwrap();
        let address = SubstringKeyDeriver.derive_address(&secret).unwrap();

        assert_eq!(address, "0x5dbb6204fe5129617082792ae468d01a3f362318");
        assert_eq!(address.len(), 42);
        assert_eq!(address, SubstringKeyDeriver.derive_address(&secret).unwrap());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = ImportSecret::parse(SECRET).unwrap();
        assert_eq!(format!("{:?}", secret), "ImportSecret([REDACTED])");
    }
}
