//! The SSE handler: `GET /mcp/sse` opens a long-lived event stream; a
//! companion `POST /mcp/sse/:client_id` feeds it JSON-RPC-style requests
//! and their responses come back as `response` events on the stream the
//! client already has open.
//!
//! Adapted from the workspace's websocket handler idea of a per-connection
//! identity and an idle/heartbeat tick, generalized from a bidirectional
//! socket to a send-only SSE stream plus a side-channel POST.

use crate::protocol;
use crate::GatewayState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use shared_types::{RpcRequest, RpcResponse};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{IntervalStream, ReceiverStream};
use uuid::Uuid;

/// Bounded capacity of a single client's outbound channel. A slow or
/// vanished client never grows unbounded server-side memory.
pub const CLIENT_CHANNEL_CAPACITY: usize = 100;
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum SseMessage {
    Response(RpcResponse),
    Error(String),
}

/// Live per-client senders, keyed by the id handed out when the stream
/// opened. The companion POST endpoint looks a client up here.
#[derive(Default)]
pub struct ClientRegistry {
    channels: DashMap<String, mpsc::Sender<SseMessage>>,
}

impl ClientRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.channels.len()
    }

    /// Best-effort delivery: a full channel means a stalled client, so the
    /// message is dropped and logged rather than blocking the caller.
    fn try_send(&self, client_id: &str, message: SseMessage) -> bool {
        match self.channels.get(client_id) {
            Some(sender) => match sender.try_send(message) {
                Ok(()) => true,
                Err(_) => {
                    tracing::warn!(client_id, "sse client channel full or closed, dropping message");
                    false
                }
            },
            None => false,
        }
    }
}

fn message_event(message: &SseMessage) -> Event {
    match message {
        SseMessage::Response(response) => Event::default().event("response").json_data(response).expect("RpcResponse always serializes"),
        SseMessage::Error(text) => Event::default().event("error").json_data(json!({"message": text})).expect("error payload always serializes"),
    }
}

/// Wraps the merged event stream so the client's channel is removed from
/// the registry the moment axum drops the response body (disconnect, or
/// the server shutting the connection down).
struct DropGuardStream<S> {
    inner: S,
    client_id: String,
    registry: Arc<ClientRegistry>,
}

impl<S: Stream + Unpin> Stream for DropGuardStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.inner).poll_next(cx)
    }
}

impl<S> Drop for DropGuardStream<S> {
    fn drop(&mut self) {
        self.registry.channels.remove(&self.client_id);
        tracing::debug!(client_id = %self.client_id, "sse client disconnected, channel released");
    }
}

/// `GET /mcp/sse` and the SSE branch of `GET /mcp`: allocate a client,
/// emit `connected` and `server_info`, then stream responses and
/// heartbeats until the client disconnects.
pub async fn open_stream(State(state): State<GatewayState>) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let client_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel(CLIENT_CHANNEL_CAPACITY);
    state.client_registry.channels.insert(client_id.clone(), tx);

    let connected = Event::default().event("connected").json_data(json!({"client_id": client_id})).expect("connected payload always serializes");
    let server_info = Event::default()
        .event("server_info")
        .json_data(json!({
            "protocol_version": protocol::PROTOCOL_VERSION,
            "server_name": protocol::SERVER_NAME,
            "tool_count": state.tool_registry.descriptors.len()
        }))
        .expect("server_info payload always serializes");
    let preamble = stream::iter(vec![connected, server_info]);

    let responses = ReceiverStream::new(rx).map(|message| message_event(&message));
    let heartbeats = IntervalStream::new(tokio::time::interval(HEARTBEAT_INTERVAL)).map(|_| Event::default().event("heartbeat").data("{}"));

    let merged = preamble.chain(stream::select(responses, heartbeats));
    let guarded = DropGuardStream { inner: merged, client_id, registry: state.client_registry.clone() };

    Sse::new(guarded.map(Ok))
}

/// `POST /mcp/sse/:client_id`: the request half of a bidirectional SSE
/// session. Dispatches immediately and pushes the response onto the
/// caller's already-open stream; the HTTP response to this POST is just
/// an acknowledgement.
pub async fn handle_message(
    State(state): State<GatewayState>,
    Path(client_id): Path<String>,
    Json(request): Json<RpcRequest>,
) -> Response {
    if !state.client_registry.channels.contains_key(&client_id) {
        return (StatusCode::NOT_FOUND, "unknown sse client").into_response();
    }

    let response = protocol::dispatch(&state.tool_registry, &client_id, request).await;
    state.client_registry.try_send(&client_id, SseMessage::Response(response));
    StatusCode::ACCEPTED.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_message_to_an_unregistered_client_is_not_delivered() {
        let registry = ClientRegistry::new();
        let delivered = registry.try_send("ghost", SseMessage::Error("boom".to_string()));
        assert!(!delivered);
    }

    #[tokio::test]
    async fn a_registered_client_receives_its_response() {
        let registry = ClientRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        registry.channels.insert("client-1".to_string(), tx);

        let delivered = registry.try_send(
            "client-1",
            SseMessage::Response(RpcResponse::ok("1", json!({"ok": true}))),
        );
        assert!(delivered);
        assert!(rx.recv().await.is_some());
    }
}
