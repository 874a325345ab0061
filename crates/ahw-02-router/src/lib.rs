//! # Router (C2)
//!
//! Shared dispatch core used by both the stdio transport and the HTTP
//! gateway: a [`registry::MethodRegistry`] mapping tool-call method names
//! to handlers, and a [`waiters::PendingWaiters`] table correlating
//! outbound frames (host → extension) with their eventual reply.

pub mod correlation;
pub mod registry;
pub mod waiters;

pub use correlation::CorrelationId;
pub use registry::{handler_fn, HandlerFn, HandlerFuture, HandlerResult, MethodRegistry};
pub use waiters::{run_cleanup_task, PendingWaiters, WaiterResult, WaiterStats};

use shared_types::{RpcRequest, RpcResponse};
use std::sync::Arc;
use std::time::Duration;

/// The default time an outstanding waiter is kept alive before the sweep
/// removes it, absent a per-call override.
pub const DEFAULT_WAITER_TIMEOUT: Duration = Duration::from_millis(5000);

/// Ties a method registry and an outstanding-waiter table together behind
/// one handle both transports can share.
pub struct Router {
    registry: MethodRegistry,
    waiters: Arc<PendingWaiters>,
}

impl Router {
    #[must_use]
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry,
            waiters: Arc::new(PendingWaiters::new(DEFAULT_WAITER_TIMEOUT)),
        }
    }

    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        self.registry.dispatch(request).await
    }

    #[must_use]
    pub fn is_registered(&self, method: &str) -> bool {
        self.registry.is_registered(method)
    }

    #[must_use]
    pub fn waiters(&self) -> Arc<PendingWaiters> {
        Arc::clone(&self.waiters)
    }
}
