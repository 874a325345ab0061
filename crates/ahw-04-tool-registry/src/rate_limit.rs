//! Per-client-identity token bucket, consulted by the tool-call protocol
//! engine before a `tools/call` is dispatched.
//!
//! Adapted from the HTTP gateway's per-IP `RateLimitState`: the bucket key
//! here is a client identity string (an SSE connection id, or the fixed
//! identity assigned to the single stdio peer) rather than an `IpAddr`,
//! since a local trust-boundary host has no meaningful notion of a remote
//! address for its one stdio relay.

use dashmap::DashMap;
use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tracing::debug;

type Limiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// Fixed identity assigned to the stdio relay, which has exactly one peer
/// and no separate connection concept the way SSE clients do.
pub const STDIO_CLIENT_IDENTITY: &str = "stdio-relay";

struct Bucket {
    limiter: Limiter,
    last_access: Instant,
}

pub struct RateLimitState {
    buckets: DashMap<String, Bucket>,
    requests_per_second: u32,
    burst_size: u32,
}

impl RateLimitState {
    #[must_use]
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            requests_per_second: requests_per_second.max(1),
            burst_size: burst_size.max(1),
        }
    }

    fn make_limiter(&self) -> Limiter {
        let quota = Quota::per_second(NonZeroU32::new(self.requests_per_second).unwrap())
            .allow_burst(NonZeroU32::new(self.burst_size).unwrap());
        RateLimiter::direct(quota)
    }

    /// Check whether `client_id` may make another tool call right now.
    /// `Err(duration)` carries how long the caller should wait before
    /// retrying.
    pub fn check(&self, client_id: &str) -> Result<(), Duration> {
        if !self.buckets.contains_key(client_id) {
            debug!(client_id, "creating new tool-call rate limit bucket");
            self.buckets.insert(
                client_id.to_string(),
                Bucket {
                    limiter: self.make_limiter(),
                    last_access: Instant::now(),
                },
            );
        }

        let mut entry = self.buckets.get_mut(client_id).expect("just inserted");
        entry.last_access = Instant::now();
        match entry.limiter.check() {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(governor::clock::Clock::now(&DefaultClock::default()));
                Err(wait)
            }
        }
    }

    /// Drop buckets untouched for longer than `max_age`, so a long-lived
    /// process does not accumulate one bucket per ever-connected client.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| now.duration_since(bucket.last_access) <= max_age);
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
