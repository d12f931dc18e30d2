//! Ethereum address derivation

use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::error::{Error, Result, ValidationError};
use super::derivation::{ImportSecret, KeyDeriver};

/// Real EVM derivation: secp256k1 public key, Keccak-256, last 20 bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1KeyDeriver;

impl KeyDeriver for Secp256k1KeyDeriver {
    fn derive_address(&self, secret: &ImportSecret) -> Result<String> {
        let bytes = hex::decode(secret.body())
            .map_err(|_| Error::Validation(ValidationError::MalformedSecret))?;

        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&bytes)
            .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        public_key_to_address(&public_key.serialize_uncompressed())
    }
}

/// Get the Ethereum address from an uncompressed public key
pub fn public_key_to_address(public_key: &[u8]) -> Result<String> {
    // The public key should be in uncompressed format (65 bytes)
    if public_key.len() != 65 {
        return Err(Error::KeyDerivation("Invalid Ethereum public key length".to_string()));
    }

    // Skip the first byte (0x04) and hash the rest
    let key_hash = keccak256(&public_key[1..]);

    Ok(format!("0x{}", hex::encode(&key_hash[12..])))
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(secret: &str) -> Result<String> {
        let secret = ImportSecret::parse(secret).unwrap();
        Secp256k1KeyDeriver.derive_address(&secret)
    }

    #[test]
    fn test_known_addresses() {
        let address = derive("0x0000000000000000000000000000000000000000000000000000000000000001").unwrap();
        assert_eq!(address, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");

        let address = derive("0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318").unwrap();
        assert_eq!(address, "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23");
    }

    #[test]
    fn test_rejects_non_hex() {
        let secret = format!("0x{}", "z".repeat(64));
        assert!(matches!(
            derive(&secret),
            Err(Error::Validation(ValidationError::MalformedSecret))
        ));
    }

    #[test]
    fn test_rejects_zero_key() {
        let secret = format!("0x{}", "0".repeat(64));
        assert!(matches!(derive(&secret), Err(Error::KeyDerivation(_))));
    }

    #[test]
    fn test_public_key_length_checked() {
        assert!(public_key_to_address(&[4u8; 33]).is_err());
    }
}
