//! # Pending-Intent Store & State Machine (C6)
//!
//! In-memory queue of DApp-originated unconfirmed intents. A `DashMap`
//! keyed by intent id, with a `RwLock` wrapped around each entry instead
//! of one lock over the whole map, gives per-id transition serialization
//! for free while `list()` still sees a consistent snapshot of every
//! intent it visits.

use chrono::Utc;
use dashmap::DashMap;
use shared_types::{IntentFilter, IntentState, PendingIntent, RejectionInfo, RejectionReason};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// The four user-visible transition failure reasons. No other failure
/// reason is ever returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NotFound,
    AlreadyRejected,
    CannotRejectConfirmed,
    Unauthorized,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::NotFound => "not found",
            Self::AlreadyRejected => "transaction already rejected",
            Self::CannotRejectConfirmed => "cannot reject confirmed",
            Self::Unauthorized => "unauthorized",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for TransitionError {}

/// Counters mirroring the gateway's `PendingStats` atomic-counter idiom.
#[derive(Debug, Default)]
pub struct PendingStats {
    pub total_added: AtomicU64,
    pub total_approved: AtomicU64,
    pub total_rejected: AtomicU64,
    pub total_confirmed: AtomicU64,
    pub total_failed: AtomicU64,
}

/// Metadata accompanying a rejecting transition.
#[derive(Debug, Clone)]
pub struct RejectMetadata {
    pub reason: RejectionReason,
    pub details: Option<String>,
    pub audit_log_id: String,
}

pub struct PendingStore {
    intents: DashMap<String, RwLock<PendingIntent>>,
    stats: PendingStats,
}

impl PendingStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            intents: DashMap::new(),
            stats: PendingStats::default(),
        }
    }

    /// Enqueue a newly-submitted intent. The intent MUST already be in
    /// `IntentState::Pending`.
    pub fn add(&self, intent: PendingIntent) {
        debug_assert_eq!(intent.state, IntentState::Pending);
        self.stats.total_added.fetch_add(1, Ordering::Relaxed);
        self.intents.insert(intent.id.clone(), RwLock::new(intent));
    }

    /// Snapshot a single intent by id.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<PendingIntent> {
        self.intents
            .get(id)
            .map(|entry| entry.value().read().unwrap().clone())
    }

    /// List intents matching `filter`, clamped to `[limit, offset]`
    /// (callers are expected to have already applied
    /// `shared_types::intent::{clamp_limit, clamp_offset}`).
    ///
    /// Each visited intent is read under its own lock, so a caller never
    /// observes a half-updated intent; there is no single lock over the
    /// whole store that would make `list` block every in-flight
    /// `transition`.
    #[must_use]
    pub fn list(&self, filter: &IntentFilter, limit: usize, offset: usize) -> Vec<PendingIntent> {
        let mut matched: Vec<PendingIntent> = self
            .intents
            .iter()
            .filter_map(|entry| {
                let intent = entry.value().read().unwrap();
                filter.matches(&intent).then(|| intent.clone())
            })
            .collect();
        matched.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// Attempt a state transition, enforcing the state machine edges,
    /// ownership (for agent-initiated transitions), and rejection
    /// metadata recording.
    ///
    /// `acting_address` is the currently-unlocked wallet's address; pass
    /// `None` for system-initiated transitions (e.g. a confirmation poll
    /// landing `approved -> confirmed`), which are not subject to the
    /// ownership check.
    pub fn transition(
        &self,
        id: &str,
        target: IntentState,
        acting_address: Option<&str>,
        reject_meta: Option<RejectMetadata>,
    ) -> Result<PendingIntent, TransitionError> {
        let entry = self.intents.get(id).ok_or(TransitionError::NotFound)?;
        let mut intent = entry.value().write().unwrap();

        if let Some(addr) = acting_address {
            if !intent.from_address.eq_ignore_ascii_case(addr) {
                return Err(TransitionError::Unauthorized);
            }
        }

        if intent.state.is_terminal() {
            return Err(match intent.state {
                IntentState::Rejected if target == IntentState::Rejected => {
                    TransitionError::AlreadyRejected
                }
                IntentState::Confirmed if target == IntentState::Rejected => {
                    TransitionError::CannotRejectConfirmed
                }
                _ => TransitionError::NotFound,
            });
        }

        if !intent.state.can_transition_to(target) {
            return Err(TransitionError::NotFound);
        }

        intent.state = target;
        intent.last_checked_at = Utc::now();

        match target {
            IntentState::Rejected => {
                let meta = reject_meta.expect("reject transition requires metadata");
                intent.rejection = Some(RejectionInfo {
                    reason: meta.reason,
                    details: meta.details,
                    rejected_at: Utc::now(),
                    audit_log_id: meta.audit_log_id,
                });
                self.stats.total_rejected.fetch_add(1, Ordering::Relaxed);
            }
            IntentState::Approved => {
                self.stats.total_approved.fetch_add(1, Ordering::Relaxed);
            }
            IntentState::Confirmed => {
                self.stats.total_confirmed.fetch_add(1, Ordering::Relaxed);
            }
            IntentState::Failed => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
            }
            IntentState::Pending => unreachable!("no edge targets Pending"),
        }

        Ok(intent.clone())
    }

    #[must_use]
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for PendingStore {
    fn default() -> Self {
        Self::new()
    }
}
