//! The streamable-HTTP handler: one request in, one response out.
//!
//! No tool today produces a genuinely streamed result, so the "chunked
//! sequence of JSON objects" case in the external contract is unreached —
//! every call returns the single `RpcResponse` as one JSON body. The shape
//! is kept as its own handler (rather than folded into the SSE one) so
//! that adding a streaming tool later only touches this function.

use crate::protocol;
use crate::GatewayState;
use axum::extract::{ConnectInfo, State};
use axum::response::Json;
use shared_types::RpcRequest;
use std::net::SocketAddr;

pub async fn handle(
    State(state): State<GatewayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(request): Json<RpcRequest>,
) -> Json<shared_types::RpcResponse> {
    let client_id = format!("stream-{peer}");
    let response = protocol::dispatch(&state.tool_registry, &client_id, request).await;
    Json(response)
}
