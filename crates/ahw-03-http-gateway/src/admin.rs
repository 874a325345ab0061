//! The localhost-only admin surface: liveness, plain-text counters, and a
//! debug dump of the pending store.
//!
//! Callers are responsible for binding this router's listener to loopback
//! only — nothing here enforces that at the HTTP layer.

use ahw_04_tool_registry::ServiceContext;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use shared_types::IntentFilter;
use std::collections::BTreeMap;

pub fn build_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/pending", get(pending))
        .with_state(ctx)
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(ctx): State<ServiceContext>) -> String {
    let intents = ctx.pending_store.list(&IntentFilter::default(), usize::MAX, 0);
    let mut by_state: BTreeMap<&'static str, usize> = BTreeMap::new();
    for intent in &intents {
        *by_state.entry(state_label(&intent.state)).or_insert(0) += 1;
    }

    let mut out = String::new();
    out.push_str(&format!("pending_intents_total {}\n", ctx.pending_store.len()));
    for (label, count) in &by_state {
        out.push_str(&format!("pending_intents_by_state{{state=\"{label}\"}} {count}\n"));
    }
    out.push_str(&format!("events_published_total {}\n", ctx.broadcaster.events_published()));
    out.push_str(&format!("audit_entries_total {}\n", ctx.audit_log.len()));
    out
}

fn state_label(state: &shared_types::IntentState) -> &'static str {
    match state {
        shared_types::IntentState::Pending => "pending",
        shared_types::IntentState::Approved => "approved",
        shared_types::IntentState::Rejected => "rejected",
        shared_types::IntentState::Confirmed => "confirmed",
        shared_types::IntentState::Failed => "failed",
    }
}

async fn pending(State(ctx): State<ServiceContext>) -> Json<Vec<shared_types::PendingIntent>> {
    Json(ctx.pending_store.list(&IntentFilter::default(), 100, 0))
}
