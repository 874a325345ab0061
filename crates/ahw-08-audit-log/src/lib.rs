//! # Audit Log (C9)
//!
//! Append-only in-memory record of every rejection, approval, and signing
//! action. Retention is process lifetime; persistence is explicitly out of
//! scope for the core.

use chrono::Utc;
use parking_lot::RwLock;
use rand::RngCore;
use shared_types::{AuditEntry, AuditSource};

/// Append-only audit log, backed by a single `RwLock<Vec<_>>`.
///
/// Writers take the write lock only for the `push`; pagination reads take
/// the read lock, per the shared-resource policy: audit entries are
/// append-only under a write lock, pagination reads are under a read lock.
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a new entry, assigning it a deterministic `audit_<hex>` id.
    /// Returns the assigned id.
    pub fn append(
        &self,
        action: impl Into<String>,
        subject: impl Into<String>,
        detail: impl Into<String>,
        reason: Option<String>,
        source: AuditSource,
        wallet_address: impl Into<String>,
    ) -> String {
        let id = generate_audit_id();
        let entry = AuditEntry {
            id: id.clone(),
            action: action.into(),
            subject: subject.into(),
            detail: detail.into(),
            reason,
            timestamp: Utc::now(),
            source,
            wallet_address: wallet_address.into(),
        };
        self.entries.write().push(entry);
        id
    }

    /// Return a clamped page of entries, most recent first.
    #[must_use]
    pub fn page(&self, limit: usize, offset: usize) -> Vec<AuditEntry> {
        let entries = self.entries.read();
        entries
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find every entry recorded for a given subject (usually an intent id).
    #[must_use]
    pub fn by_subject(&self, subject: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.subject == subject)
            .cloned()
            .collect()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_audit_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("audit_{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_well_formed_id() {
        let log = AuditLog::new();
        let id = log.append(
            "transaction_approval",
            "0xabc",
            "approved by agent",
            None,
            AuditSource::AiAgent,
            "0xwallet",
        );
        assert!(id.starts_with("audit_"));
        assert_eq!(id.len(), "audit_".len() + 32);
    }

    #[test]
    fn page_returns_most_recent_first_and_respects_limit_offset() {
        let log = AuditLog::new();
        for i in 0..5 {
            log.append(
                "transaction_rejection",
                format!("tx-{i}"),
                "rejected",
                None,
                AuditSource::AiAgent,
                "0xwallet",
            );
        }
        let page = log.page(2, 1);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].subject, "tx-3");
        assert_eq!(page[1].subject, "tx-2");
    }

    #[test]
    fn by_subject_finds_every_matching_entry() {
        let log = AuditLog::new();
        log.append(
            "transaction_approval",
            "tx-1",
            "approved",
            None,
            AuditSource::AiAgent,
            "0xwallet",
        );
        log.append(
            "transaction_status_changed",
            "tx-1",
            "confirmed",
            None,
            AuditSource::System,
            "0xwallet",
        );
        log.append(
            "transaction_approval",
            "tx-2",
            "approved",
            None,
            AuditSource::AiAgent,
            "0xwallet",
        );
        assert_eq!(log.by_subject("tx-1").len(), 2);
        assert_eq!(log.by_subject("tx-2").len(), 1);
        assert_eq!(log.len(), 3);
    }
}
