//! Pending-intent domain types: the record, its state machine's states, and
//! the list filter accepted by `get_pending_transactions`.

use crate::chain::ChainTag;
use serde::{Deserialize, Serialize};

/// State of a pending intent. Transitions are enforced by the store in
/// `ahw-05-pending-store`, not by this type; this enum only names the
/// states and documents the permitted edges.
///
/// ```text
/// Pending  -> Approved | Rejected
/// Approved -> Confirmed | Failed
/// Rejected, Confirmed, Failed -> (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentState {
    Pending,
    Approved,
    Rejected,
    Confirmed,
    Failed,
}

impl IntentState {
    /// True if `target` is a legal next state from `self`.
    #[must_use]
    pub fn can_transition_to(self, target: IntentState) -> bool {
        use IntentState::{Approved, Confirmed, Failed, Pending, Rejected};
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Confirmed) | (Approved, Failed)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IntentState::Rejected | IntentState::Confirmed | IntentState::Failed
        )
    }
}

/// The kind of operation a pending intent represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Transfer,
    Swap,
    Contract,
    Sign,
}

/// The closed vocabulary of rejection reasons accepted by `reject_transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    SuspiciousActivity,
    HighGasFee,
    UserRequest,
    SecurityConcern,
    DuplicateTransaction,
}

impl RejectionReason {
    /// The accepted set, in the order surfaced to the caller in a validation
    /// error's `suggestion` field.
    pub const ALL: &'static [&'static str] = &[
        "suspicious_activity",
        "high_gas_fee",
        "user_request",
        "security_concern",
        "duplicate_transaction",
    ];

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "suspicious_activity" => Some(Self::SuspiciousActivity),
            "high_gas_fee" => Some(Self::HighGasFee),
            "user_request" => Some(Self::UserRequest),
            "security_concern" => Some(Self::SecurityConcern),
            "duplicate_transaction" => Some(Self::DuplicateTransaction),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuspiciousActivity => "suspicious_activity",
            Self::HighGasFee => "high_gas_fee",
            Self::UserRequest => "user_request",
            Self::SecurityConcern => "security_concern",
            Self::DuplicateTransaction => "duplicate_transaction",
        }
    }
}

/// Metadata recorded on a rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionInfo {
    pub reason: RejectionReason,
    pub details: Option<String>,
    pub rejected_at: chrono::DateTime<chrono::Utc>,
    pub audit_log_id: String,
}

/// A DApp-originated, unconfirmed wallet operation parked awaiting an
/// approve/reject decision from an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingIntent {
    /// Opaque string identity (a transaction hash, for `send_transaction`
    /// originated intents).
    pub id: String,
    pub chain: ChainTag,
    pub from_address: String,
    pub to_address: String,
    /// Decimal string, chain-native unit.
    pub amount: String,
    /// `"native"` or a token contract/mint address.
    pub token: String,
    pub intent_type: IntentType,
    pub state: IntentState,
    pub submission_origin: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub last_checked_at: chrono::DateTime<chrono::Utc>,
    pub priority: u8,
    pub estimated_confirmation_secs: u64,
    pub required_confirmations: u32,
    pub rejection: Option<RejectionInfo>,
}

/// Filter accepted by `get_pending_transactions` / `PendingStore::list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentFilter {
    pub chain: Option<ChainTag>,
    /// Matches either `from_address` or `to_address`, case-insensitively.
    pub address: Option<String>,
    pub intent_type: Option<IntentType>,
}

impl IntentFilter {
    #[must_use]
    pub fn matches(&self, intent: &PendingIntent) -> bool {
        if let Some(chain) = &self.chain {
            if chain != &intent.chain {
                return false;
            }
        }
        if let Some(addr) = &self.address {
            let addr = addr.to_ascii_lowercase();
            let from = intent.from_address.to_ascii_lowercase();
            let to = intent.to_address.to_ascii_lowercase();
            if from != addr && to != addr {
                return false;
            }
        }
        if let Some(kind) = self.intent_type {
            if kind != intent.intent_type {
                return false;
            }
        }
        true
    }
}

/// Clamp a requested `limit` to `[1, 100]`, defaulting non-positive values
/// to 10.
#[must_use]
pub fn clamp_limit(limit: i64) -> usize {
    if limit <= 0 {
        10
    } else if limit > 100 {
        100
    } else {
        limit as usize
    }
}

/// Clamp a requested `offset` to a non-negative value.
#[must_use]
pub fn clamp_offset(offset: i64) -> usize {
    offset.max(0) as usize
}
