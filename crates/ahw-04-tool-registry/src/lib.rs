//! # Tool Registry (C5)
//!
//! The agent-facing surface of the host: a fixed, enumerable set of tool
//! descriptors (exposed via `tools/list`) backed by a [`MethodRegistry`]
//! of handlers, plus the per-client rate limiter the protocol engine
//! consults before dispatching a `tools/call`.
//!
//! The five wallet-lifecycle methods are deliberately not part of this
//! registry — see [`descriptor::PRIVILEGED_METHODS`].

pub mod chain_err;
pub mod context;
pub mod descriptor;
pub mod handlers;
pub mod params;
pub mod rate_limit;

pub use context::ServiceContext;

use ahw_02_router::registry::MethodRegistry;
use rate_limit::RateLimitState;
use shared_types::ToolDescriptor;
use std::sync::Arc;

/// Default requests-per-second and burst size for the agent-facing tool
/// rate limiter, applied per client identity.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
pub const DEFAULT_BURST_SIZE: u32 = 20;

/// The complete agent-facing tool surface: descriptors for `tools/list`,
/// a populated method registry for dispatch, and the rate limiter the
/// protocol engine checks first.
pub struct ToolRegistry {
    pub descriptors: Vec<ToolDescriptor>,
    pub methods: MethodRegistry,
    pub rate_limiter: Arc<RateLimitState>,
}

impl ToolRegistry {
    /// Build the standard registry: all ten agent tools, wired to `ctx`.
    #[must_use]
    pub fn standard(ctx: ServiceContext) -> Self {
        let mut methods = MethodRegistry::new();
        handlers::register_all(&mut methods, ctx);

        Self {
            descriptors: descriptor::standard_tools(),
            methods,
            rate_limiter: Arc::new(RateLimitState::new(DEFAULT_REQUESTS_PER_SECOND, DEFAULT_BURST_SIZE)),
        }
    }
}
