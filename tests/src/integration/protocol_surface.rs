//! The shared-registry-across-transports pattern: one `ToolRegistry`
//! resolves a method identically whether it is reached via the stdio
//! frame path (`ahw-01` + `ahw-02`) or the HTTP tool-call protocol engine
//! (`ahw-03`'s `protocol::dispatch`).

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::unlocked_context;
    use ahw_01_stdio_transport::{run_reader_loop, FramedWriter};
    use ahw_03_http_gateway::protocol;
    use ahw_04_tool_registry::ToolRegistry;
    use serde_json::json;
    use shared_types::{Frame, RpcRequest};
    use std::pin::Pin;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::task::{Context, Poll};
    use tokio::io::AsyncWrite;

    fn encode_frame(frame: &Frame) -> Vec<u8> {
        let payload = serde_json::to_vec(frame).unwrap();
        let len = (payload.len() as u32).to_le_bytes();
        let mut out = len.to_vec();
        out.extend_from_slice(&payload);
        out
    }

    /// An `AsyncWrite` sink backed by a plain `Vec<u8>` that stays
    /// readable from outside the writer that owns it, so a test can both
    /// feed a `FramedWriter` and inspect exactly what it wrote.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl AsyncWrite for SharedBuf {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }
        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Dispatching `get_pending_transactions` directly through the shared
    /// `MethodRegistry` (the stdio-side code path) and through the HTTP
    /// protocol engine's `tools/call` wrapper must reach the identical
    /// handler and therefore agree on every field of the result.
    #[tokio::test]
    async fn stdio_and_http_tools_call_resolve_to_the_same_handler() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        let registry = ToolRegistry::standard(ctx);

        let direct = registry
            .methods
            .dispatch(RpcRequest {
                id: "direct".into(),
                method: "get_pending_transactions".into(),
                params: json!({"chain": "ethereum"}),
            })
            .await;

        let via_protocol = protocol::dispatch(
            &registry,
            "http-client",
            RpcRequest {
                id: "viahttp".into(),
                method: "tools/call".into(),
                params: json!({"name": "get_pending_transactions", "arguments": {"chain": "ethereum"}}),
            },
        )
        .await;

        let direct_result = direct.result.unwrap();
        let wrapped_text = via_protocol.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
        let wrapped_result: serde_json::Value = serde_json::from_str(&wrapped_text).unwrap();

        assert_eq!(direct_result, wrapped_result);
    }

    /// A full stdio round trip: an `rpc_request` frame is read off a byte
    /// stream, dispatched through the same protocol engine the HTTP
    /// gateway uses, and the resulting `rpc_response` frame is written
    /// back out through the single-writer `FramedWriter`. Decoding that
    /// output with the same length-prefix convention must yield back the
    /// exact response the handler produced.
    #[tokio::test]
    async fn a_tool_call_frame_round_trips_through_the_stdio_transport() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        let registry = Arc::new(ToolRegistry::standard(ctx));

        let request_frame = Frame::RpcRequest(RpcRequest {
            id: "stdio-1".into(),
            method: "tools/call".into(),
            params: json!({"name": "get_pending_transactions", "arguments": {}}),
        });
        let input_bytes = encode_frame(&request_frame);

        let output = SharedBuf::default();
        let writer = Arc::new(FramedWriter::new(output.clone()));

        run_reader_loop(std::io::Cursor::new(input_bytes), move |frame| {
            let registry = Arc::clone(&registry);
            let writer = Arc::clone(&writer);
            async move {
                if let Frame::RpcRequest(req) = frame {
                    let response = protocol::dispatch(&registry, "stdio", req).await;
                    writer.send(&Frame::RpcResponse(response)).await.unwrap();
                }
            }
        })
        .await
        .unwrap();

        let written = output.0.lock().unwrap();
        let len_prefix = u32::from_le_bytes(written[0..4].try_into().unwrap());
        assert_eq!(len_prefix as usize, written.len() - 4, "length prefix must match the payload that follows it");

        let decoded: Frame = serde_json::from_slice(&written[4..]).unwrap();
        let Frame::RpcResponse(response) = decoded else {
            panic!("expected an rpc_response frame back, got {decoded:?}");
        };
        assert_eq!(response.id, "stdio-1");
        assert!(response.result.unwrap()["content"][0]["text"].is_string());
    }
}
