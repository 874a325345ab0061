//! Small helpers for pulling typed fields out of a tool call's raw
//! `serde_json::Value` arguments, turning a missing or mistyped field into
//! the same [`HostError::Validation`] shape every handler returns.

use serde_json::Value;
use shared_types::HostError;

pub fn required_str<'a>(params: &'a Value, field: &str) -> Result<&'a str, HostError> {
    params
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HostError::validation(field, "required non-empty string"))
}

#[must_use]
pub fn optional_str<'a>(params: &'a Value, field: &str) -> Option<&'a str> {
    params.get(field).and_then(Value::as_str)
}

#[must_use]
pub fn optional_i64(params: &Value, field: &str, default: i64) -> i64 {
    params.get(field).and_then(Value::as_i64).unwrap_or(default)
}

#[must_use]
pub fn optional_bool(params: &Value, field: &str, default: bool) -> bool {
    params.get(field).and_then(Value::as_bool).unwrap_or(default)
}

/// Split a comma-separated id list, trimming whitespace and dropping empty
/// segments. Used by `approve_transaction`/`reject_transaction`, which
/// accept either a single id or a comma-separated batch.
#[must_use]
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Best-effort chain inference from an address's shape, for the two tools
/// (`get_balance`, `get_transactions`) whose wire contract does not carry
/// an explicit chain field.
#[must_use]
pub fn infer_chain_from_address(address: &str) -> &'static str {
    if address.starts_with("0x") {
        "ethereum"
    } else {
        "solana"
    }
}
