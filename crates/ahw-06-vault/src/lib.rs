//! # Vault (C7)
//!
//! Password-derived encryption of the single on-disk wallet record, with a
//! lock/unlock lifecycle and zeroize-on-drop in-memory decrypted material.
//!
//! Persistence follows the same temp-file-then-rename discipline as the
//! workspace's file-backed key-value store, generalized from a binary
//! `[len][bytes]` stream to a single JSON document.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use shared_crypto::{decrypt, encrypt, generate_salt, CryptoError, Nonce, SecretKey};
use shared_types::{EncryptedBlob, WalletRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("a wallet already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("no wallet found")]
    NotFound,

    #[error("incorrect password or corrupted wallet")]
    UnlockFailed,

    #[error("vault is locked")]
    Locked,

    #[error("storage encryption failed: {0}")]
    Storage(String),
}

impl From<CryptoError> for VaultError {
    fn from(_: CryptoError) -> Self {
        // Authentication failures, wrong keys, and tampered ciphertext all
        // collapse to the single generic message the vault reports.
        VaultError::UnlockFailed
    }
}

/// In-memory material unlocked from the vault. Zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct UnlockedMaterial {
    private_key: Vec<u8>,
    mnemonic: Vec<u8>,
}

impl UnlockedMaterial {
    #[must_use]
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    #[must_use]
    pub fn mnemonic(&self) -> &[u8] {
        &self.mnemonic
    }
}

enum VaultState {
    Locked,
    Unlocked(UnlockedMaterial),
}

/// Manages the single on-disk wallet record for this installation.
pub struct Vault {
    wallet_path: PathBuf,
    state: VaultState,
    record: Option<WalletRecord>,
}

impl Vault {
    /// Resolve the vault directory from `wallet_home` (the caller is
    /// expected to have already applied the `ALGONIUS_WALLET_HOME`
    /// fallback) and load any existing record without unlocking it.
    #[must_use]
    pub fn open(wallet_home: impl AsRef<Path>) -> Self {
        let wallet_path = wallet_home.as_ref().join("wallets").join("wallet.json");
        let record = load_record(&wallet_path).ok();
        Self {
            wallet_path,
            state: VaultState::Locked,
            record,
        }
    }

    /// A cheap predicate that does not require the password.
    #[must_use]
    pub fn has_wallet(&self) -> bool {
        self.record.is_some()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, VaultState::Unlocked(_))
    }

    /// Address of the on-disk wallet, if any, regardless of lock state.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.address.as_str())
    }

    /// Create a brand-new wallet record, encrypting `private_key` and
    /// `mnemonic` under a key derived from `password`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AlreadyExists`] if a wallet record is already
    /// present on disk.
    pub fn create(
        &mut self,
        address: &str,
        public_key: &str,
        private_key: &[u8],
        mnemonic: &[u8],
        password: &str,
        chains: std::collections::BTreeMap<String, bool>,
    ) -> Result<(), VaultError> {
        if self.has_wallet() {
            return Err(VaultError::AlreadyExists(self.wallet_path.clone()));
        }

        let encrypted_private_key = seal(password, private_key)?;
        let encrypted_mnemonic = seal(password, mnemonic)?;

        let now = Utc::now();
        let record = WalletRecord {
            address: address.to_string(),
            public_key: public_key.to_string(),
            encrypted_private_key,
            encrypted_mnemonic,
            chains,
            created_at: now,
            last_used: now,
        };

        persist_record(&self.wallet_path, &record)
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        self.record = Some(record);
        Ok(())
    }

    /// Derive the key from `password` and the stored salts, decrypt both
    /// ciphertexts, and populate in-memory material.
    ///
    /// Any decryption failure (wrong password, wrong salt, tampered
    /// ciphertext) collapses to the single [`VaultError::UnlockFailed`]
    /// message and the vault remains locked.
    pub fn unlock(&mut self, password: &str) -> Result<(), VaultError> {
        let record = self.record.as_ref().ok_or(VaultError::NotFound)?;

        let private_key = open(password, &record.encrypted_private_key)?;
        let mnemonic = open(password, &record.encrypted_mnemonic)?;

        self.state = VaultState::Unlocked(UnlockedMaterial {
            private_key,
            mnemonic,
        });
        Ok(())
    }

    /// Overwrite in-memory secret material with zero bytes and mark the
    /// vault locked. Idempotent.
    pub fn lock(&mut self) {
        self.state = VaultState::Locked;
    }

    /// Access the unlocked material, if any.
    pub fn unlocked(&self) -> Result<&UnlockedMaterial, VaultError> {
        match &self.state {
            VaultState::Unlocked(material) => Ok(material),
            VaultState::Locked => Err(VaultError::Locked),
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&WalletRecord> {
        self.record.as_ref()
    }
}

fn seal(password: &str, plaintext: &[u8]) -> Result<EncryptedBlob, VaultError> {
    let salt = generate_salt();
    let key = SecretKey::derive(password.as_bytes(), &salt);
    let (ciphertext, nonce) = encrypt(&key, plaintext).map_err(|e| VaultError::Storage(e.to_string()))?;
    Ok(EncryptedBlob {
        salt: STANDARD.encode(salt),
        nonce: STANDARD.encode(nonce.as_bytes()),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

fn open(password: &str, blob: &EncryptedBlob) -> Result<Vec<u8>, VaultError> {
    let salt_bytes = STANDARD
        .decode(&blob.salt)
        .map_err(|_| VaultError::UnlockFailed)?;
    let salt: [u8; 32] = salt_bytes.try_into().map_err(|_| VaultError::UnlockFailed)?;

    let nonce_bytes = STANDARD
        .decode(&blob.nonce)
        .map_err(|_| VaultError::UnlockFailed)?;
    let nonce_arr: [u8; 12] = nonce_bytes.try_into().map_err(|_| VaultError::UnlockFailed)?;
    let nonce = Nonce::from_bytes(nonce_arr);

    let ciphertext = STANDARD
        .decode(&blob.ciphertext)
        .map_err(|_| VaultError::UnlockFailed)?;

    let key = SecretKey::derive(password.as_bytes(), &salt);
    Ok(decrypt(&key, &ciphertext, &nonce)?)
}

fn load_record(path: &Path) -> Result<WalletRecord, std::io::Error> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn persist_record(path: &Path, record: &WalletRecord) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
        set_mode(parent, 0o700)?;
    }

    let bytes = serde_json::to_vec_pretty(record)?;
    let temp_path = path.with_extension("tmp");

    std::fs::write(&temp_path, &bytes)?;
    set_mode(&temp_path, 0o600)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn chains() -> BTreeMap<String, bool> {
        let mut m = BTreeMap::new();
        m.insert("ethereum".to_string(), true);
        m
    }

    #[test]
    fn create_then_unlock_round_trips_secret_material() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = Vault::open(dir.path());
        assert!(!vault.has_wallet());

        vault
            .create(
                "0xabc",
                "0xpub",
                b"super-secret-private-key",
                b"twelve word mnemonic phrase goes right here",
                "correct horse battery staple",
                chains(),
            )
            .unwrap();
        assert!(vault.has_wallet());
        assert!(!vault.is_unlocked());

        vault.unlock("correct horse battery staple").unwrap();
        assert!(vault.is_unlocked());
        assert_eq!(vault.unlocked().unwrap().private_key(), b"super-secret-private-key");
    }

    #[test]
    fn wrong_password_reports_generic_unlock_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = Vault::open(dir.path());
        vault
            .create("0xabc", "0xpub", b"pk", b"mnemonic", "correct password", chains())
            .unwrap();

        let err = vault.unlock("wrong password").unwrap_err();
        assert!(matches!(err, VaultError::UnlockFailed));
        assert!(!vault.is_unlocked());
    }

    #[test]
    fn create_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = Vault::open(dir.path());
        vault
            .create("0xabc", "0xpub", b"pk", b"mnemonic", "pw", chains())
            .unwrap();

        let err = vault
            .create("0xdef", "0xpub2", b"pk2", b"mnemonic2", "pw", chains())
            .unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));
    }

    #[test]
    fn lock_is_idempotent_and_clears_access() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = Vault::open(dir.path());
        vault
            .create("0xabc", "0xpub", b"pk", b"mnemonic", "pw", chains())
            .unwrap();
        vault.unlock("pw").unwrap();

        vault.lock();
        vault.lock();
        assert!(!vault.is_unlocked());
        assert!(matches!(vault.unlocked().unwrap_err(), VaultError::Locked));
    }

    #[test]
    fn reopening_the_same_directory_reloads_the_record() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut vault = Vault::open(dir.path());
            vault
                .create("0xabc", "0xpub", b"pk", b"mnemonic", "pw", chains())
                .unwrap();
        }

        let reopened = Vault::open(dir.path());
        assert!(reopened.has_wallet());
        assert_eq!(reopened.address(), Some("0xabc"));
    }
}
