//! `HostError`: the internal error taxonomy every component crate's
//! fallible operations return. The six kinds below map onto the fixed wire
//! codes in [`crate::envelope::codes`] through [`HostError::into_rpc_error`];
//! nothing downstream needs its own ad hoc error-to-code mapping.

use crate::envelope::{codes, RpcError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// Input shape or value rejected by a tool's schema or a hand-written
    /// validator. Carries the offending field name and the reason.
    #[error("validation failed on `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// An outbound call to a chain endpoint failed or timed out.
    #[error("network error: {message}")]
    Network { message: String, retry_suggested: bool },

    /// No wallet, wallet locked, wallet already exists, insufficient
    /// balance, or a storage encryption failure.
    #[error("wallet state error: {message}")]
    WalletState { code: i32, message: String },

    /// Unsupported or malformed token/chain identifier.
    #[error("unsupported token or chain: {message}")]
    Token { message: String },

    /// Ownership mismatch, privileged method reached from a public
    /// transport, or a rate limit was exhausted.
    #[error("permission denied: {message}")]
    Permission { message: String },

    /// A method name with no registered handler.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Bug or encoding failure; never surfaces internals to the caller.
    #[error("internal error")]
    Internal(String),
}

impl HostError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Permission {
            message: "unauthorized".to_string(),
        }
    }

    /// Convert to the wire-facing [`RpcError`], assigning the fixed integer
    /// code for this error's kind. Internal errors never leak their message
    /// verbatim; validation and network errors carry extra structure.
    #[must_use]
    pub fn into_rpc_error(self) -> RpcError {
        match self {
            HostError::Validation { field, reason } => {
                RpcError::invalid_params(&field, &reason).with_data(json!({"field": field}))
            }
            HostError::Network { message, retry_suggested } => {
                let mut err = RpcError::new(codes::SERVER_ERROR, message);
                if retry_suggested {
                    err = err.with_suggestion(json!("retry"));
                }
                err
            }
            HostError::WalletState { code, message } => RpcError::new(code, message),
            HostError::Token { message } => RpcError::new(codes::UNSUPPORTED_CHAIN, message),
            HostError::Permission { message } => RpcError::new(codes::UNAUTHORIZED, message),
            HostError::MethodNotFound(method) => RpcError::method_not_found(&method),
            HostError::Internal(_) => {
                RpcError::server_error("internal error")
            }
        }
    }
}
