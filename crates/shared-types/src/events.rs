//! Events fanned out to the stdio/extension consumer only.
//!
//! Never surfaced to an agent over the HTTP tool-call surface: the agent
//! learns about state changes by polling (`get_pending_transactions`,
//! `get_transaction_status`), not by subscribing to this stream.

use crate::intent::IntentState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WalletEvent {
    TransactionConfirmationNeeded {
        intent_id: String,
        chain: String,
        from_address: String,
        to_address: String,
        amount: String,
    },
    TransactionStatusChanged {
        intent_id: String,
        previous_state: IntentState,
        new_state: IntentState,
    },
    WalletLocked {
        address: String,
    },
    WalletUnlocked {
        address: String,
    },
}

impl WalletEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransactionConfirmationNeeded { .. } => "transaction_confirmation_needed",
            Self::TransactionStatusChanged { .. } => "transaction_status_changed",
            Self::WalletLocked { .. } => "wallet_locked",
            Self::WalletUnlocked { .. } => "wallet_unlocked",
        }
    }
}
