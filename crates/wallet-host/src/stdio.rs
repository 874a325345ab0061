//! Stdio-side wiring: the one `MethodRegistry` this transport dispatches
//! against. It registers the same ten agent tools
//! `ahw_04_tool_registry::ToolRegistry::standard` builds for the HTTP side
//! (by calling the very same `handlers::register_all`), plus the five
//! privileged wallet-lifecycle methods and the DApp-intent methods that
//! must never be reachable through `tools/call`. The HTTP gateway only
//! ever sees `ToolRegistry::standard`'s registry, so the extra methods
//! registered here are simply never exposed to an agent.

use crate::dapp_intent::{self, DappContext};
use crate::privileged;
use ahw_01_stdio_transport::{run_reader_loop, FramedWriter};
use ahw_02_router::registry::MethodRegistry;
use ahw_04_tool_registry::{handlers, ServiceContext};
use shared_types::{Frame, WalletEvent};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast::error::RecvError;

#[must_use]
pub fn build_registry<W>(ctx: ServiceContext, writer: Arc<FramedWriter<W>>) -> MethodRegistry
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut registry = MethodRegistry::new();
    handlers::register_all(&mut registry, ctx.clone());
    privileged::register(&mut registry, ctx.clone());
    dapp_intent::register(&mut registry, DappContext { service: ctx, writer });
    registry
}

/// Drive the read side of the stdio transport: decode inbound
/// `rpc_request` frames, dispatch them against `registry`, and write the
/// `rpc_response` back out. A frame that is not a request (there should be
/// none inbound from the relay) is silently ignored.
pub async fn run_request_loop<R, W>(reader: R, registry: Arc<MethodRegistry>, writer: Arc<FramedWriter<W>>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let result = run_reader_loop(reader, move |frame| {
        let registry = Arc::clone(&registry);
        let writer = Arc::clone(&writer);
        async move {
            let Frame::RpcRequest(request) = frame else {
                return;
            };
            let response = registry.dispatch(request).await;
            if let Err(err) = writer.send(&Frame::RpcResponse(response)).await {
                tracing::error!(error = %err, "failed to write response frame to stdio");
            }
        }
    })
    .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "stdio reader loop exited with an error");
    }
}

/// Forward every broadcast [`WalletEvent`] onto the stdio transport as an
/// `event` frame. Meant to run as a single long-lived task — the only
/// subscriber this broadcaster ever has, per the crate's core invariant
/// that the HTTP/SSE gateway never holds a receiver.
pub async fn run_event_forwarder<W>(
    mut receiver: tokio::sync::broadcast::Receiver<WalletEvent>,
    writer: Arc<FramedWriter<W>>,
) where
    W: AsyncWrite + Unpin + Send + 'static,
{
    loop {
        match receiver.recv().await {
            Ok(event) => match serde_json::to_value(&event) {
                Ok(payload) => {
                    if let Err(err) = writer.send(&Frame::Event(payload)).await {
                        tracing::error!(error = %err, "failed to write event frame to stdio");
                    }
                }
                Err(err) => tracing::error!(error = %err, "failed to encode wallet event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event forwarder lagged behind the broadcaster");
            }
            Err(RecvError::Closed) => {
                tracing::info!("event broadcaster closed; stopping the stdio event forwarder");
                return;
            }
        }
    }
}
