//! # Symmetric Encryption & Key Derivation
//!
//! AES-256-GCM authenticated encryption with a 12-byte nonce, and a
//! PBKDF2-HMAC-SHA256 key derivation function for turning a user password
//! plus a random salt into a symmetric key.
//!
//! The vault's crypto constants (salt size, nonce size, iteration count) are
//! fixed system-wide; they are not configurable per record.

use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// Symmetric key size in bytes.
pub const KEY_SIZE: usize = 32;
/// KDF salt size in bytes.
pub const SALT_SIZE: usize = 32;
/// AEAD nonce size in bytes.
pub const NONCE_SIZE: usize = 12;
/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Secret key (256-bit), zeroed on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Derive a key from a password and salt via PBKDF2-HMAC-SHA256 with
    /// [`KDF_ITERATIONS`] rounds.
    #[must_use]
    pub fn derive(password: &[u8], salt: &[u8; SALT_SIZE]) -> Self {
        let mut out = [0u8; KEY_SIZE];
        pbkdf2_hmac::<Sha256>(password, salt, KDF_ITERATIONS, &mut out);
        Self(out)
    }
}

/// A fresh-per-ciphertext 12-byte AEAD nonce.
#[derive(Clone)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// Generate a fresh [`SALT_SIZE`]-byte KDF salt.
#[must_use]
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut bytes = [0u8; SALT_SIZE];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    bytes
}

/// Encrypt `plaintext` with AES-256-GCM under a fresh nonce.
///
/// Returns `(ciphertext_with_tag, nonce)`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if the underlying AEAD call
/// fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::generate();

    let ciphertext = cipher
        .encrypt(AesNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Decrypt `ciphertext` (tag included) with AES-256-GCM.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if authentication fails (wrong
/// key, wrong nonce, or tampered ciphertext) — the same error for all
/// three, by design, so the vault can report one generic message.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &Nonce) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(AesNonce::from_slice(nonce.as_bytes()), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
