//! The on-disk wallet record: plaintext identity fields plus independently
//! encrypted private-key and recovery-phrase blobs.
//!
//! Field layout and naming follow the persisted-state contract exactly
//! (`wallet.json` under `ALGONIUS_WALLET_HOME/wallets/`); `ahw-06-vault`
//! is the only crate that constructs or consumes the ciphertext fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An authenticated-encryption ciphertext, base64-encoded field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Base64 of the 32-byte KDF salt.
    pub salt: String,
    /// Base64 of the 12-byte AEAD nonce.
    pub nonce: String,
    /// Base64 of ciphertext with the authentication tag appended.
    pub ciphertext: String,
}

/// The single-wallet-per-installation on-disk record.
///
/// Invariant: present on disk only in its entirety (the vault writes via a
/// temp-file-then-rename so a crash never leaves a half-written record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub address: String,
    pub public_key: String,
    pub encrypted_private_key: EncryptedBlob,
    pub encrypted_mnemonic: EncryptedBlob,
    /// Enabled chain tags, e.g. `{"ethereum": true, "solana": false}`.
    pub chains: BTreeMap<String, bool>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_used: chrono::DateTime<chrono::Utc>,
}
