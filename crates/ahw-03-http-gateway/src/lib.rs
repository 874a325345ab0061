//! # Dual HTTP Surface & Tool Protocol Engine (C3 + C4)
//!
//! The agent-facing half of the host. Three routes share one
//! [`ToolRegistry`]: `/mcp` auto-selects a transport by content
//! negotiation, `/mcp/sse` is always Server-Sent Events, `/mcp/stream` is
//! always one-request-one-response streamable HTTP.
//!
//! This crate never holds a [`EventBroadcaster`](ahw_09_event_broadcaster::EventBroadcaster)
//! receiver — only `wallet-host`'s stdio task subscribes to that. Agents
//! learn about pending intents exclusively by polling `get_pending_transactions`.
//!
//! [`build_router`] returns a service that must be served with
//! `into_make_service_with_connect_info::<SocketAddr>()`, since the
//! streamable-HTTP handler keys its rate-limit bucket on the peer address.

pub mod admin;
pub mod negotiate;
pub mod protocol;
pub mod sse;
pub mod streamable;

use ahw_04_tool_registry::ToolRegistry;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use negotiate::Transport;
use serde_json::json;
use shared_types::envelope::codes;
use shared_types::RpcRequest;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared state behind every route in [`build_router`].
#[derive(Clone)]
pub struct GatewayState {
    pub tool_registry: Arc<ToolRegistry>,
    pub client_registry: Arc<sse::ClientRegistry>,
}

impl GatewayState {
    #[must_use]
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self { tool_registry, client_registry: Arc::new(sse::ClientRegistry::new()) }
    }
}

/// Default per-request timeout applied ahead of every route. Overridable
/// by passing a different value to [`build_router_with_timeout`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

#[must_use]
pub fn build_router(tool_registry: Arc<ToolRegistry>) -> Router {
    build_router_with_timeout(tool_registry, DEFAULT_REQUEST_TIMEOUT)
}

/// `cors → tracing → timeout`, in that order (outermost first), matching
/// the workspace's existing HTTP router layer ordering. Per-client rate
/// limiting happens one layer further in, inside the protocol engine,
/// since it needs the client identity each handler already computed.
#[must_use]
pub fn build_router_with_timeout(tool_registry: Arc<ToolRegistry>, timeout: Duration) -> Router {
    let state = GatewayState::new(tool_registry);

    let middleware = ServiceBuilder::new()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout));

    Router::new()
        .route("/mcp", get(auto_select).post(auto_select_post))
        .route("/mcp/sse", get(sse::open_stream))
        .route("/mcp/sse/:client_id", post(sse::handle_message))
        .route("/mcp/stream", post(streamable::handle))
        .with_state(state)
        .layer(middleware)
}

/// `GET /mcp`: open an SSE stream when the caller's `Accept`/query/User-Agent
/// asks for one, otherwise fall through to the streamable handler (which
/// for a `GET` with no body answers with a protocol-level invalid-request
/// error, since streamable calls are always a `POST`).
async fn auto_select(
    State(state): State<GatewayState>,
    Query(query): Query<HashMap<String, String>>,
    headers: axum::http::HeaderMap,
) -> Response {
    match negotiate::select_transport(&headers, &query) {
        Transport::Sse => sse::open_stream(State(state)).await.into_response(),
        Transport::Stream => {
            axum::http::StatusCode::BAD_REQUEST.into_response()
        }
    }
}

/// `POST /mcp`: the same auto-select priority order as the `GET` branch,
/// applied to a bidirectional-SSE caller that opens its stream with a
/// `POST` instead of a `GET`. An SSE selection opens the stream exactly
/// like the `GET` path and ignores the POST body — the client drives
/// subsequent requests through the companion `POST /mcp/sse/:client_id`
/// endpoint once it has its id. A streamable selection parses the body as
/// one JSON-RPC request and dispatches it, same as `POST /mcp/stream`.
async fn auto_select_post(
    State(state): State<GatewayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<HashMap<String, String>>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Response {
    match negotiate::select_transport(&headers, &query) {
        Transport::Sse => sse::open_stream(State(state)).await.into_response(),
        Transport::Stream => {
            let request: RpcRequest = match serde_json::from_slice(&body) {
                Ok(request) => request,
                Err(err) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": {"code": codes::INVALID_PARAMS, "message": err.to_string()}})),
                    )
                        .into_response();
                }
            };
            let client_id = format!("stream-{peer}");
            let response = protocol::dispatch(&state.tool_registry, &client_id, request).await;
            Json(response).into_response()
        }
    }
}
