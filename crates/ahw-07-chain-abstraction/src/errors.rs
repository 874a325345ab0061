use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid mnemonic")]
    InvalidMnemonic,

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("network error: {message}")]
    Network { message: String, retry_suggested: bool },

    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("internal chain-plugin error: {0}")]
    Internal(String),
}
