//! # Event Broadcaster (C10)
//!
//! Single-producer, multi-consumer fan-out of [`WalletEvent`]s to the
//! stdio/extension relay. There is deliberately no filter or topic
//! concept here, unlike the bus this is adapted from: this broadcaster
//! has exactly one consumer class, so the only thing worth tracking is
//! whether anyone is listening at all.
//!
//! Nothing in this crate prevents the HTTP gateway from subscribing; the
//! restriction to the stdio/extension consumer is enforced by
//! construction — `wallet-host`'s wiring never hands a receiver to the
//! HTTP side.

use shared_types::WalletEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default broadcast channel capacity: a slow or absent consumer can fall
/// behind by this many events before `recv` returns `Lagged`.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub struct EventBroadcaster {
    sender: broadcast::Sender<WalletEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl EventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to the event stream. Intended to be called exactly once,
    /// by the stdio transport task.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers received it. `0`
    /// means the event was dropped (no one is currently listening), which
    /// is an ordinary condition before the stdio transport has connected.
    pub fn publish(&self, event: WalletEvent) -> usize {
        let name = event.name();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(event = name, receivers = receiver_count, "event published");
                receiver_count
            }
            Err(_) => {
                warn!(event = name, "event dropped, no subscribers");
                0
            }
        }
    }

    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
