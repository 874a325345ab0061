//! Audit log entry.

use serde::{Deserialize, Serialize};

/// Who initiated the action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSource {
    AiAgent,
    User,
    System,
}

/// A single append-only audit record.
///
/// Entries never mutate after creation. `id` has the form `audit_<hex>`
/// where `<hex>` is 16 bytes of randomness, assigned by the audit log on
/// `append`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    /// e.g. `transaction_approval`, `transaction_rejection`, `sign_message`,
    /// `sign_failed`.
    pub action: String,
    /// Usually the pending-intent id.
    pub subject: String,
    pub detail: String,
    pub reason: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: AuditSource,
    pub wallet_address: String,
}
