//! Outstanding-request table: correlates an outbound frame the host sends
//! to the browser-extension relay with the eventual reply frame.
//!
//! Register a waiter before sending, complete it when the matching reply
//! arrives, and sweep anything that outlived its timeout. A reply that
//! names an id with no matching waiter (already timed out, or never
//! registered) is dropped silently rather than treated as an error.

use crate::correlation::CorrelationId;
use dashmap::DashMap;
use shared_types::RpcError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What a waiter is ultimately resolved with.
pub type WaiterResult = Result<serde_json::Value, RpcError>;

struct Waiter {
    sender: oneshot::Sender<WaiterResult>,
    created_at: Instant,
    method: String,
    timeout: Duration,
}

#[derive(Debug, Default)]
pub struct WaiterStats {
    pub total_registered: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_timed_out: AtomicU64,
    pub total_cancelled: AtomicU64,
}

/// Correlation-id-keyed table of requests awaiting a reply frame.
pub struct PendingWaiters {
    waiters: DashMap<CorrelationId, Waiter>,
    default_timeout: Duration,
    stats: Arc<WaiterStats>,
}

impl PendingWaiters {
    #[must_use]
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            waiters: DashMap::new(),
            default_timeout,
            stats: Arc::new(WaiterStats::default()),
        }
    }

    /// Register a new waiter and return its id plus the receiver half.
    pub fn register(
        &self,
        method: &str,
        timeout: Option<Duration>,
    ) -> (CorrelationId, oneshot::Receiver<WaiterResult>) {
        let id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();

        self.waiters.insert(
            id,
            Waiter {
                sender: tx,
                created_at: Instant::now(),
                method: method.to_string(),
                timeout: timeout.unwrap_or(self.default_timeout),
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
        debug!(correlation_id = %id, method, "registered outstanding waiter");

        (id, rx)
    }

    /// Resolve a waiter with the reply that arrived for it.
    ///
    /// Returns `true` if a waiter was found and its receiver was still
    /// live; `false` for an unknown id (already timed out, or a
    /// duplicate/late reply) and for a receiver the caller already
    /// dropped.
    pub fn complete(&self, id: CorrelationId, result: WaiterResult) -> bool {
        let Some((_, waiter)) = self.waiters.remove(&id) else {
            warn!(correlation_id = %id, "reply for unknown or expired waiter; dropping");
            return false;
        };

        match waiter.sender.send(result) {
            Ok(()) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Sweep every waiter past its timeout. Returns how many were removed.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.waiters.retain(|id, waiter| {
            let elapsed = now.duration_since(waiter.created_at);
            if elapsed > waiter.timeout {
                warn!(
                    correlation_id = %id,
                    method = waiter.method,
                    elapsed_ms = elapsed.as_millis(),
                    "waiter timed out"
                );
                self.stats.total_timed_out.fetch_add(1, Ordering::Relaxed);
                removed += 1;
                false
            } else {
                true
            }
        });

        removed
    }

    #[must_use]
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.waiters.contains_key(id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.waiters.len()
    }

    pub fn cancel(&self, id: &CorrelationId) -> bool {
        self.waiters
            .remove(id)
            .map(|_| {
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            })
            .is_some()
    }

    #[must_use]
    pub fn stats(&self) -> &WaiterStats {
        &self.stats
    }
}

/// Periodically sweep expired waiters. Intended to run as a background
/// task for the lifetime of the host process.
pub async fn run_cleanup_task(waiters: Arc<PendingWaiters>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let removed = waiters.remove_expired();
        if removed > 0 {
            debug!(removed, "swept expired waiters");
        }
    }
}
