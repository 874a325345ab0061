//! Tool Protocol Engine (C4): the four-and-a-bit verbs both transports
//! dispatch into.
//!
//! `initialize`, `tools/list`, `tools/call`, `resources/list` and
//! `resources/read` are not registered inside [`ToolRegistry::methods`] —
//! that registry holds only the ten agent tools (see its own doc comment).
//! Instead this module is the thin layer that speaks the protocol: it
//! answers the first three verbs from the registry's descriptors and rate
//! limiter, and for `tools/call` forwards into
//! `ToolRegistry::methods::dispatch` so a stdio `rpc_request` and an HTTP
//! `tools/call` body reach the identical handler.

use ahw_04_tool_registry::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::envelope::codes;
use shared_types::{HostError, RpcError, RpcRequest, RpcResponse};

/// Advertised to callers via `initialize`. Not tied to any external
/// standard's version scheme — it is this host's own contract version.
pub const PROTOCOL_VERSION: &str = "1.0";
pub const SERVER_NAME: &str = "algonius-wallet-host";

/// A single block of a [`ToolCallResult`]. Only the text variant exists
/// today; `tools/call` never streams binary content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

/// The uniform `tools/call` result wrapper: a structured-or-markdown
/// content block plus a success flag, regardless of which of the ten
/// tools produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

fn initialize_result(registry: &ToolRegistry) -> Value {
    json!({
        "protocol_version": PROTOCOL_VERSION,
        "server_name": SERVER_NAME,
        "server_version": env!("CARGO_PKG_VERSION"),
        "capabilities": {
            "tools": {"list_changed": false},
            "resources": {"list_changed": false}
        },
        "tool_count": registry.descriptors.len()
    })
}

fn tools_list_result(registry: &ToolRegistry) -> Value {
    json!({ "tools": registry.descriptors })
}

fn resources_list_result() -> Value {
    json!({ "resources": [] })
}

async fn tools_call(registry: &ToolRegistry, request: RpcRequest) -> RpcResponse {
    let name = match request.params.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => return RpcResponse::err(request.id, RpcError::invalid_params("name", "required")),
    };
    let arguments = request.params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    if !registry.methods.is_registered(&name) {
        return RpcResponse::err(request.id, HostError::MethodNotFound(name).into_rpc_error());
    }

    let inner = RpcRequest { id: request.id.clone(), method: name, params: arguments };
    let inner_response = registry.methods.dispatch(inner).await;

    match inner_response.error {
        Some(err) => RpcResponse::err(request.id, err),
        None => {
            let value = inner_response.result.unwrap_or(Value::Null);
            let text = serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string());
            let result = ToolCallResult { content: vec![ContentBlock::Text { text }], is_error: false };
            RpcResponse::ok(request.id, serde_json::to_value(result).expect("ToolCallResult always serializes"))
        }
    }
}

fn resources_read(request: RpcRequest) -> RpcResponse {
    RpcResponse::err(
        request.id,
        RpcError::new(codes::SERVER_ERROR, "no resources are exposed by this host"),
    )
}

/// Dispatch a single request through the protocol engine on behalf of
/// `client_id` (an SSE connection id, or the fixed stdio identity). Checks
/// the per-client token bucket before doing anything else.
pub async fn dispatch(registry: &ToolRegistry, client_id: &str, request: RpcRequest) -> RpcResponse {
    if let Err(wait) = registry.rate_limiter.check(client_id) {
        return RpcResponse::err(
            request.id,
            RpcError::new(codes::RATE_LIMITED, format!("rate limit exceeded, retry in {:.1}s", wait.as_secs_f32())),
        );
    }

    match request.method.as_str() {
        "initialize" => RpcResponse::ok(request.id, initialize_result(registry)),
        "tools/list" => RpcResponse::ok(request.id, tools_list_result(registry)),
        "tools/call" => tools_call(registry, request).await,
        "resources/list" => RpcResponse::ok(request.id, resources_list_result()),
        "resources/read" => resources_read(request),
        other => RpcResponse::err(request.id.clone(), HostError::MethodNotFound(other.to_string()).into_rpc_error()),
    }
}
