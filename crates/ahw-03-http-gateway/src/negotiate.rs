//! Transport selection for the auto-select `/mcp` path.
//!
//! Priority order, per the external-interface contract: `Accept` header
//! containing `text/event-stream`, then a `transport=sse` query parameter,
//! then a `User-Agent` matching `eventsource` (case-insensitive). Anything
//! else goes to the streamable-HTTP handler.

use axum::http::HeaderMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Sse,
    Stream,
}

#[must_use]
pub fn select_transport(headers: &HeaderMap, query: &HashMap<String, String>) -> Transport {
    if header_contains(headers, axum::http::header::ACCEPT, "text/event-stream") {
        return Transport::Sse;
    }
    if query.get("transport").map(|v| v.eq_ignore_ascii_case("sse")).unwrap_or(false) {
        return Transport::Sse;
    }
    if header_contains(headers, axum::http::header::USER_AGENT, "eventsource") {
        return Transport::Sse;
    }
    Transport::Stream
}

fn header_contains(headers: &HeaderMap, name: axum::http::HeaderName, needle: &str) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains(needle))
        .unwrap_or(false)
}
