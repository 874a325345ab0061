//! EVM-family chain plug-in (Ethereum, BSC, and other EVM-compatible
//! chains differing only in defaults).
//!
//! Signing enforces low-S / EIP-2 malleability discipline the same way a
//! verifier would check it, just applied on the production side instead
//! of the recovery side.

use crate::endpoint::EndpointManager;
use crate::errors::ChainError;
use crate::{ChainPlugin, CreatedWallet, SignedMessage, TransactionStatus, TxStatus};
use async_trait::async_trait;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use std::sync::atomic::{AtomicU64, Ordering};

/// secp256k1 private keys must land strictly in `[1, n-1]`; SHA-256 over
/// arbitrary entropy lands outside that range with negligible probability,
/// but we still loop rather than assume it.
fn scalar_from_entropy(entropy: &[u8]) -> SigningKey {
    let mut seed = Keccak256::digest(entropy);
    loop {
        if let Ok(key) = SigningKey::from_bytes(&seed) {
            return key;
        }
        seed = Keccak256::digest(seed);
    }
}

fn keccak_address(verifying_key: &VerifyingKey) -> String {
    let point = verifying_key.to_encoded_point(false);
    let uncompressed = point.as_bytes();
    // Strip the leading 0x04 tag; hash the raw 64-byte X||Y.
    let hash = Keccak256::digest(&uncompressed[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

fn personal_sign_hash(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// EVM plug-in, parameterized by the alias it was registered under (so
/// one implementation serves Ethereum, BSC, and any other EVM-compatible
/// chain with its own required-confirmation count and endpoint pool).
pub struct EvmPlugin {
    tag: String,
    required_confirmations: u32,
    endpoints: EndpointManager,
    mock_height: AtomicU64,
}

impl EvmPlugin {
    #[must_use]
    pub fn new(tag: impl Into<String>, required_confirmations: u32, endpoints: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            required_confirmations,
            endpoints: EndpointManager::from_env(endpoints),
            mock_height: AtomicU64::new(1),
        }
    }

    /// Default Ethereum mainnet configuration (6 confirmations).
    #[must_use]
    pub fn ethereum(endpoints: Vec<String>) -> Self {
        Self::new("ethereum", 6, endpoints)
    }

    /// Default BSC configuration (3 confirmations).
    #[must_use]
    pub fn bsc(endpoints: Vec<String>) -> Self {
        Self::new("bsc", 3, endpoints)
    }
}

#[async_trait]
impl ChainPlugin for EvmPlugin {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn required_confirmations(&self) -> u32 {
        self.required_confirmations
    }

    fn create(&self) -> Result<CreatedWallet, ChainError> {
        let mut entropy = [0u8; 16];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut entropy);
        let mnemonic = hex::encode(entropy);
        self.import_from_mnemonic(&mnemonic, None)
    }

    fn import_from_mnemonic(
        &self,
        mnemonic: &str,
        _derivation_path: Option<&str>,
    ) -> Result<CreatedWallet, ChainError> {
        let entropy = hex::decode(mnemonic).map_err(|_| ChainError::InvalidMnemonic)?;
        if entropy.len() != 16 {
            return Err(ChainError::InvalidMnemonic);
        }

        let signing_key = scalar_from_entropy(&entropy);
        let verifying_key = signing_key.verifying_key();
        let address = keccak_address(verifying_key);
        let public_key = hex::encode(verifying_key.to_encoded_point(false).as_bytes());

        Ok(CreatedWallet {
            address,
            public_key: format!("0x{public_key}"),
            private_key: signing_key.to_bytes().to_vec(),
            mnemonic: mnemonic.to_string(),
        })
    }

    fn sign_message(&self, private_key: &[u8], message: &[u8]) -> Result<SignedMessage, ChainError> {
        let key_bytes: [u8; 32] = private_key
            .try_into()
            .map_err(|_| ChainError::Internal("malformed private key".to_string()))?;
        let signing_key =
            SigningKey::from_bytes(&key_bytes.into()).map_err(|e| ChainError::Internal(e.to_string()))?;

        let hash = personal_sign_hash(message);
        let (signature, recovery_id): (Signature, RecoveryId) = signing_key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| ChainError::Internal(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte() + 27);

        Ok(SignedMessage {
            signature: format!("0x{}", hex::encode(bytes)),
            public_key: hex::encode(signing_key.verifying_key().to_encoded_point(false).as_bytes()),
        })
    }

    async fn get_balance(&self, _address: &str, _token: Option<&str>) -> Result<String, ChainError> {
        if self.endpoints.is_mock() {
            return Ok("1000000000000000000".to_string());
        }
        let _endpoint = self.endpoints.next_endpoint()?;
        Err(ChainError::Network {
            message: "live RPC transport not wired in this deployment".to_string(),
            retry_suggested: true,
        })
    }

    async fn estimate_gas(&self, _from: &str, _to: &str, _amount: &str) -> Result<String, ChainError> {
        if self.endpoints.is_mock() {
            return Ok("21000".to_string());
        }
        let _endpoint = self.endpoints.next_endpoint()?;
        Err(ChainError::Network {
            message: "live RPC transport not wired in this deployment".to_string(),
            retry_suggested: true,
        })
    }

    async fn send_transaction(
        &self,
        _private_key: &[u8],
        _to: &str,
        _amount: &str,
    ) -> Result<String, ChainError> {
        if self.endpoints.is_mock() {
            let mut bytes = [0u8; 32];
            rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
            return Ok(format!("0x{}", hex::encode(bytes)));
        }
        let _endpoint = self.endpoints.next_endpoint()?;
        Err(ChainError::Network {
            message: "live RPC transport not wired in this deployment".to_string(),
            retry_suggested: true,
        })
    }

    async fn confirm_transaction(&self, hash: &str) -> Result<TransactionStatus, ChainError> {
        if self.endpoints.is_mock() {
            let height = self.mock_height.fetch_add(1, Ordering::Relaxed);
            let confirmations = height.min(u64::from(self.required_confirmations)) as u32;
            let status = if confirmations >= self.required_confirmations {
                TxStatus::Confirmed
            } else {
                TxStatus::Pending
            };
            return Ok(TransactionStatus {
                status,
                confirmations,
                required: self.required_confirmations,
                block_number: Some(18_000_000 + height),
                gas_used: Some(21_000),
                fee: Some("0.00042".to_string()),
                timestamp: chrono::Utc::now(),
                hash: hash.to_string(),
            });
        }
        let _endpoint = self.endpoints.next_endpoint()?;
        Err(ChainError::Network {
            message: "live RPC transport not wired in this deployment".to_string(),
            retry_suggested: true,
        })
    }
}
