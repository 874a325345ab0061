//! Method registry: name → handler, with panic-isolated dispatch.
//!
//! A handler panic must never take the whole host down (one bad signer
//! call shouldn't stop every other in-flight tool call), so dispatch runs
//! each call on its own task and turns a panic into an ordinary internal
//! server error instead of propagating it.

use shared_types::{HostError, RpcRequest, RpcResponse};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerResult = Result<serde_json::Value, HostError>;
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
pub type HandlerFn = Arc<dyn Fn(serde_json::Value) -> HandlerFuture + Send + Sync>;

/// Wrap a plain async closure into the boxed-future shape handlers are
/// stored as.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |params| Box::pin(f(params)))
}

#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, HandlerFn>,
}

impl MethodRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, handler: HandlerFn) {
        self.handlers.insert(name.into(), handler);
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[must_use]
    pub fn method_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Dispatch one request to its handler, isolating a handler panic
    /// behind a dedicated task so it surfaces as a server error rather
    /// than unwinding into the caller.
    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let Some(handler) = self.handlers.get(&request.method).cloned() else {
            return RpcResponse::err(request.id, shared_types::RpcError::method_not_found(&request.method));
        };

        let method = request.method.clone();
        let id = request.id.clone();
        let params = request.params;

        match tokio::spawn(async move { handler(params).await }).await {
            Ok(Ok(value)) => RpcResponse::ok(id, value),
            Ok(Err(host_err)) => RpcResponse::err(id, host_err.into_rpc_error()),
            Err(join_err) => {
                tracing::error!(error = %join_err, method, "tool handler panicked");
                RpcResponse::err(id, shared_types::RpcError::server_error("internal error"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dispatch_routes_to_the_registered_handler() {
        let mut registry = MethodRegistry::new();
        registry.register(
            "echo",
            handler_fn(|params| async move { Ok(params) }),
        );

        let request = RpcRequest {
            id: "1".to_string(),
            method: "echo".to_string(),
            params: serde_json::json!({"hello": "world"}),
        };
        let response = registry.dispatch(request).await;
        assert_eq!(response.result.unwrap()["hello"], "world");
    }

    #[tokio::test]
    async fn unregistered_method_reports_method_not_found() {
        let registry = MethodRegistry::new();
        let request = RpcRequest {
            id: "1".to_string(),
            method: "frobnicate".to_string(),
            params: serde_json::Value::Null,
        };
        let response = registry.dispatch(request).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, shared_types::codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn a_handler_panic_becomes_a_server_error_instead_of_crashing_dispatch() {
        let mut registry = MethodRegistry::new();
        registry.register(
            "boom",
            handler_fn(|_params| async move {
                panic!("deliberate handler panic");
                #[allow(unreachable_code)]
                Ok(serde_json::Value::Null)
            }),
        );

        let request = RpcRequest {
            id: "1".to_string(),
            method: "boom".to_string(),
            params: serde_json::Value::Null,
        };
        let response = registry.dispatch(request).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, shared_types::codes::SERVER_ERROR);
    }

    #[tokio::test]
    async fn a_host_error_is_translated_to_its_rpc_code() {
        let mut registry = MethodRegistry::new();
        registry.register(
            "reject",
            handler_fn(|_params| async move {
                Err(HostError::validation("amount", "must be positive"))
            }),
        );

        let request = RpcRequest {
            id: "1".to_string(),
            method: "reject".to_string(),
            params: serde_json::Value::Null,
        };
        let response = registry.dispatch(request).await;
        assert_eq!(response.error.unwrap().code, shared_types::codes::INVALID_PARAMS);
    }
}
