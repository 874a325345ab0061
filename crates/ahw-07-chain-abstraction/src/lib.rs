//! # Chain Abstraction (C8)
//!
//! One `ChainPlugin` per supported blockchain family, behind a registry
//! keyed by normalized chain alias. A chain plug-in owns: wallet creation
//! from fresh entropy, import from an existing mnemonic, balance/gas/send
//! RPC calls (through an [`endpoint::EndpointManager`]), confirmation
//! polling, and message signing.

pub mod endpoint;
pub mod errors;
pub mod plugins;

use chrono::{DateTime, Utc};
pub use errors::ChainError;
use shared_types::ChainTag;
use std::collections::HashMap;
use std::sync::Arc;

/// The sentinel a DApp/agent prefixes a `sign_message` argument with to
/// signal that the remainder is base64-encoded raw bytes rather than a
/// UTF-8 text message. Stripped at this boundary; it never reaches a
/// plug-in's signing routine.
pub const SOLANA_RAW_BYTES_SENTINEL: &str = "__SOLANA_RAW_BYTES__:";

/// Parse a `sign_message` input string into the bytes to actually sign
/// plus whether the sentinel was present. The sentinel, if present, is
/// consumed here and never forwarded.
#[must_use]
pub fn parse_sign_message_input(raw: &str) -> (Vec<u8>, bool) {
    if let Some(encoded) = raw.strip_prefix(SOLANA_RAW_BYTES_SENTINEL) {
        use base64::{engine::general_purpose::STANDARD, Engine};
        match STANDARD.decode(encoded) {
            Ok(bytes) => return (bytes, true),
            Err(_) => return (Vec::new(), true),
        }
    }
    (raw.as_bytes().to_vec(), false)
}

/// A freshly created or imported wallet identity.
pub struct CreatedWallet {
    pub address: String,
    pub public_key: String,
    pub private_key: Vec<u8>,
    pub mnemonic: String,
}

/// Result of a signed message.
pub struct SignedMessage {
    pub signature: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Confirmation-polling status record.
#[derive(Debug, Clone)]
pub struct TransactionStatus {
    pub status: TxStatus,
    pub confirmations: u32,
    pub required: u32,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub fee: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
}

/// Object-safe per-chain operations. One implementation per chain family
/// (EVM, Solana); a single EVM implementation serves every EVM-compatible
/// alias with different defaults (required confirmations, endpoint set).
#[async_trait::async_trait]
pub trait ChainPlugin: Send + Sync {
    fn tag(&self) -> &str;

    fn required_confirmations(&self) -> u32;

    fn create(&self) -> Result<CreatedWallet, ChainError>;

    fn import_from_mnemonic(
        &self,
        mnemonic: &str,
        derivation_path: Option<&str>,
    ) -> Result<CreatedWallet, ChainError>;

    fn sign_message(&self, private_key: &[u8], message: &[u8]) -> Result<SignedMessage, ChainError>;

    async fn get_balance(&self, address: &str, token: Option<&str>) -> Result<String, ChainError>;

    async fn estimate_gas(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<String, ChainError>;

    async fn send_transaction(
        &self,
        private_key: &[u8],
        to: &str,
        amount: &str,
    ) -> Result<String, ChainError>;

    async fn confirm_transaction(&self, hash: &str) -> Result<TransactionStatus, ChainError>;
}

/// Maps normalized chain aliases to the plug-in that serves them.
#[derive(Default)]
pub struct ChainRegistry {
    plugins: HashMap<String, Arc<dyn ChainPlugin>>,
}

impl ChainRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    pub fn register(&mut self, alias: &str, plugin: Arc<dyn ChainPlugin>) {
        self.plugins.insert(ChainTag::normalize(alias).as_str().to_string(), plugin);
    }

    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<Arc<dyn ChainPlugin>> {
        self.plugins.get(ChainTag::normalize(alias).as_str()).cloned()
    }

    pub fn get_or_unsupported(&self, alias: &str) -> Result<Arc<dyn ChainPlugin>, ChainError> {
        self.resolve(alias)
            .ok_or_else(|| ChainError::UnsupportedChain(alias.to_string()))
    }
}
