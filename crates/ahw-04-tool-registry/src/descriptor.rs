//! Static tool metadata: one const-shaped entry per name, built once and
//! handed out verbatim by `tools/list`.
//!
//! The five privileged wallet-lifecycle methods (`create_wallet`,
//! `import_wallet`, `unlock_wallet`, `lock_wallet`, `wallet_status`) are
//! deliberately absent from this list — `wallet-host` registers them
//! directly on the shared router, never through a `ToolRegistry`, so an
//! agent has no way to discover them via `tools/list`.

use serde_json::json;
use shared_types::ToolDescriptor;

/// Names no [`ToolDescriptor`] in this module may ever carry. Exercised by
/// a test below rather than enforced at runtime — there is no runtime path
/// that could add one of these by accident, since they are never built
/// from this function.
pub const PRIVILEGED_METHODS: &[&str] =
    &["create_wallet", "import_wallet", "unlock_wallet", "lock_wallet", "wallet_status"];

#[must_use]
pub fn standard_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "get_balance".to_string(),
            description: "Get the native or token balance of a wallet address.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "address": {"type": "string"},
                    "token": {"type": "string"}
                },
                "required": ["address"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "get_transactions".to_string(),
            description: "List known transactions involving an address.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "address": {"type": "string"},
                    "from_block": {"type": "string"},
                    "to_block": {"type": "string"},
                    "limit": {"type": "integer"},
                    "offset": {"type": "integer"}
                },
                "required": ["address"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "get_pending_transactions".to_string(),
            description: "List DApp-originated transactions awaiting approval or rejection.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "chain": {"type": "string"},
                    "address": {"type": "string"},
                    "transaction_type": {"type": "string"},
                    "limit": {"type": "integer"},
                    "offset": {"type": "integer"}
                }
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "approve_transaction".to_string(),
            description: "Approve one or more pending transactions, signing and broadcasting them.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "transaction_hash": {"type": "string"},
                    "transaction_ids": {"type": "string"},
                    "action": {"type": "string"},
                    "reason": {"type": "string"},
                    "details": {"type": "string"}
                }
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "reject_transaction".to_string(),
            description: "Reject one or more pending transactions with a reason from a closed vocabulary.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "transaction_ids": {"type": "string"},
                    "reason": {"type": "string"},
                    "details": {"type": "string"},
                    "notify_user": {"type": "boolean"},
                    "audit_log": {"type": "boolean"}
                },
                "required": ["transaction_ids", "reason"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "send_transaction".to_string(),
            description: "Directly sign and broadcast a transaction from the unlocked wallet.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "chain": {"type": "string"},
                    "from": {"type": "string"},
                    "to": {"type": "string"},
                    "amount": {"type": "string"},
                    "token": {"type": "string"},
                    "gas_limit": {"type": "string"},
                    "gas_price": {"type": "string"}
                },
                "required": ["chain", "from", "to", "amount"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "sign_message".to_string(),
            description: "Sign an arbitrary message with the unlocked wallet's key.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "address": {"type": "string"},
                    "message": {"type": "string"},
                    "is_raw_bytes": {"type": "boolean"}
                },
                "required": ["address", "message"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "swap_tokens".to_string(),
            description: "Swap one token for another at the given address.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "chain": {"type": "string"},
                    "from_token": {"type": "string"},
                    "to_token": {"type": "string"},
                    "amount": {"type": "string"},
                    "from_address": {"type": "string"},
                    "slippage": {"type": "string"}
                },
                "required": ["chain", "from_token", "to_token", "amount", "from_address"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "simulate_transaction".to_string(),
            description: "Estimate the gas cost and outcome of a transaction without broadcasting it.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "chain": {"type": "string"},
                    "from": {"type": "string"},
                    "to": {"type": "string"},
                    "amount": {"type": "string"}
                },
                "required": ["chain", "from", "to", "amount"]
            }),
            output_schema: None,
        },
        ToolDescriptor {
            name: "get_transaction_status".to_string(),
            description: "Poll a transaction's confirmation status.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "chain": {"type": "string"},
                    "tx_hash": {"type": "string"},
                    "required_confirmations": {"type": "integer"}
                },
                "required": ["chain", "tx_hash"]
            }),
            output_schema: None,
        },
    ]
}
