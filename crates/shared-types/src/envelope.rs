//! The JSON-RPC-style request/response envelope shared by both transports,
//! and the fixed integer error-code taxonomy.
//!
//! `{id, method, params}` in; `{id, result}` or `{id, error}` out. A
//! response always carries the id of its request; ids are opaque strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed integer error codes. Negative codes follow the JSON-RPC 2.0
/// reserved range; wallet-specific codes occupy `-32001..=-32005`.
pub mod codes {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const SERVER_ERROR: i32 = -32000;
    pub const INVALID_MNEMONIC: i32 = -32001;
    pub const WEAK_PASSWORD: i32 = -32002;
    pub const UNSUPPORTED_CHAIN: i32 = -32003;
    pub const WALLET_ALREADY_EXISTS: i32 = -32004;
    pub const STORAGE_ENCRYPTION_FAILED: i32 = -32005;
    pub const RATE_LIMITED: i32 = -32029;
    pub const TIMEOUT: i32 = -32030;
    pub const UNAUTHORIZED: i32 = -32031;
}

/// Inbound or outbound RPC-shaped request, as carried on either transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Structured RPC error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Present on validation and network errors; a hint to the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Value>,
}

impl RpcError {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Value) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    #[must_use]
    pub fn invalid_params(field: &str, reason: &str) -> Self {
        Self::new(codes::INVALID_PARAMS, format!("invalid parameter `{field}`: {reason}"))
    }

    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(codes::SERVER_ERROR, message.into())
    }
}

/// Outbound response envelope: exactly one of `result`/`error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    #[must_use]
    pub fn ok(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn err(id: impl Into<String>, error: RpcError) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }
}

/// A single frame as exchanged over the length-prefixed stdio transport.
/// HTTP transports carry the same three shapes without this wrapper, since
/// each HTTP request/response or SSE message already has an unambiguous
/// direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    RpcRequest(RpcRequest),
    RpcResponse(RpcResponse),
    Event(Value),
}
