//! Maps [`ChainError`] (the chain-plugin crate's error type) onto the
//! host-wide [`HostError`] taxonomy, the same way every other fallible
//! subsystem's error collapses into the six kinds the wire protocol knows.

use ahw_07_chain_abstraction::ChainError;
use shared_types::{codes, HostError};

pub fn map_chain_error(err: ChainError) -> HostError {
    match err {
        ChainError::InvalidMnemonic => HostError::WalletState {
            code: codes::INVALID_MNEMONIC,
            message: "invalid mnemonic".to_string(),
        },
        ChainError::UnsupportedChain(chain) => HostError::Token {
            message: format!("unsupported chain: {chain}"),
        },
        ChainError::Network { message, retry_suggested } => HostError::Network { message, retry_suggested },
        ChainError::InvalidDerivationPath(path) => {
            HostError::validation("derivation_path", format!("invalid derivation path: {path}"))
        }
        ChainError::Internal(message) => HostError::Internal(message),
    }
}
