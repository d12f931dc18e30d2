//! Credential verification for unlocking a session
//!
//! The create and import flows enroll the supplied password; the access flow
//! verifies it. A failed verification leaves the session untouched.

use std::sync::{Arc, PoisonError, RwLock};

use bcrypt::{hash, verify};
use rand::{rngs::OsRng, RngCore};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result, ValidationError};

/// Pluggable credential check consulted by the session manager
pub trait CredentialVerifier: Send + Sync {
    /// Register `password` as the credential for subsequent unlocks
    fn enroll(&self, password: &str) -> Result<()>;

    /// Check `password` against the enrolled credential
    fn verify(&self, password: &str) -> Result<()>;
}

/// Accepts every password. Development only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVerification;

impl CredentialVerifier for NoVerification {
    fn enroll(&self, _password: &str) -> Result<()> {
        Ok(())
    }

    fn verify(&self, _password: &str) -> Result<()> {
        warn!("credential check disabled; accepting password unconditionally");
        Ok(())
    }
}

/// Check a password against the minimum length
pub fn validate_password(password: &str, min_len: usize) -> std::result::Result<(), ValidationError> {
    if password.chars().count() < min_len {
        return Err(ValidationError::WeakPassword { min: min_len });
    }
    Ok(())
}

/// bcrypt-hashed password held in memory
pub struct HashedPasswordVerifier {
    cost: u32,
    min_len: usize,
    password_hash: RwLock<Option<String>>,
}

impl HashedPasswordVerifier {
    /// Create a verifier with nothing enrolled
    pub fn new(cost: u32, min_len: usize) -> Self {
        Self {
            cost,
            min_len,
            password_hash: RwLock::new(None),
        }
    }

    /// Create a verifier around a previously stored bcrypt hash
    pub fn with_hash(cost: u32, min_len: usize, password_hash: String) -> Self {
        Self {
            cost,
            min_len,
            password_hash: RwLock::new(Some(password_hash)),
        }
    }

    /// Whether a credential has been enrolled
    pub fn is_enrolled(&self) -> bool {
        self.password_hash
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CredentialVerifier for HashedPasswordVerifier {
    fn enroll(&self, password: &str) -> Result<()> {
        validate_password(password, self.min_len)?;

        let hashed = hash(password, self.cost)
            .map_err(|e| Error::Credential(format!("Failed to hash password: {}", e)))?;

        *self.password_hash.write().unwrap_or_else(PoisonError::into_inner) = Some(hashed);
        debug!("password credential enrolled");
        Ok(())
    }

    fn verify(&self, password: &str) -> Result<()> {
        let stored = self
            .password_hash
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| Error::Credential("No password enrolled".to_string()))?;

        let matches = verify(password, &stored)
            .map_err(|e| Error::Credential(format!("Failed to verify password: {}", e)))?;

        if !matches {
            return Err(Error::Credential("Incorrect password".to_string()));
        }
        Ok(())
    }
}

/// A signing device holding a secp256k1 key that never leaves it
pub trait KeyDevice: Send + Sync {
    /// The device's public key
    fn public_key(&self) -> Result<PublicKey>;

    /// Sign a 32-byte digest
    fn sign_digest(&self, digest: [u8; 32]) -> Result<Signature>;
}

/// In-process key device for development and tests
pub struct SoftwareKeyDevice {
    secret_key: SecretKey,
}

impl SoftwareKeyDevice {
    /// Create a device with a fresh random key
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self::from_secret_bytes(&bytes)
    }

    /// Create a device from raw secret key bytes
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;
        Ok(Self { secret_key })
    }
}

impl KeyDevice for SoftwareKeyDevice {
    fn public_key(&self) -> Result<PublicKey> {
        let secp = Secp256k1::new();
        Ok(PublicKey::from_secret_key(&secp, &self.secret_key))
    }

    fn sign_digest(&self, digest: [u8; 32]) -> Result<Signature> {
        let secp = Secp256k1::new();
        Ok(secp.sign_ecdsa(&Message::from_digest(digest), &self.secret_key))
    }
}

/// Challenge/response against a hardware key.
///
/// Each unlock signs SHA-256(nonce || password) on the device and checks the
/// signature against the public key captured at enrollment. This proves the
/// enrolled device is present; the password only salts the challenge and is
/// not checked, so any password unlocks while the device is attached. Wrap the
/// device in its own PIN check if one is needed.
pub struct HardwareKeyVerifier {
    device: Arc<dyn KeyDevice>,
    enrolled_key: RwLock<Option<PublicKey>>,
}

impl HardwareKeyVerifier {
    /// Create a verifier for `device` with nothing enrolled
    pub fn new(device: Arc<dyn KeyDevice>) -> Self {
        Self {
            device,
            enrolled_key: RwLock::new(None),
        }
    }

    fn challenge_digest(nonce: &[u8; 32], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(nonce);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

impl CredentialVerifier for HardwareKeyVerifier {
    fn enroll(&self, _password: &str) -> Result<()> {
        let public_key = self.device.public_key()?;
        *self.enrolled_key.write().unwrap_or_else(PoisonError::into_inner) = Some(public_key);
        debug!("hardware key enrolled");
        Ok(())
    }

    fn verify(&self, password: &str) -> Result<()> {
        let enrolled = *self.enrolled_key.read().unwrap_or_else(PoisonError::into_inner);
        let enrolled =
            enrolled.ok_or_else(|| Error::Credential("No hardware key enrolled".to_string()))?;

        let mut nonce = [0u8; 32];
        OsRng.fill_bytes(&mut nonce);
        let digest = Self::challenge_digest(&nonce, password);

        let signature = self.device.sign_digest(digest)?;

        let secp = Secp256k1::verification_only();
        secp.verify_ecdsa(&Message::from_digest(digest), &signature, &enrolled)
            .map_err(|_| Error::Credential("Hardware key signature rejected".to_string()))
    }
}
