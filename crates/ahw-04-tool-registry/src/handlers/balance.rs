//! `get_balance` and `get_transactions`: read-only lookups, no audit entry.

use crate::chain_err::map_chain_error;
use crate::context::ServiceContext;
use crate::params::{infer_chain_from_address, optional_i64, optional_str, required_str};
use serde_json::{json, Value};
use shared_types::{clamp_limit, clamp_offset, HostError, IntentFilter};

pub async fn get_balance(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let address = required_str(&params, "address")?;
    let token = optional_str(&params, "token");
    let chain = infer_chain_from_address(address);

    let plugin = ctx
        .chain_registry
        .get_or_unsupported(chain)
        .map_err(map_chain_error)?;
    let balance = plugin
        .get_balance(address, token)
        .await
        .map_err(map_chain_error)?;

    Ok(json!({
        "address": address,
        "chain": chain,
        "token": token.unwrap_or("native"),
        "balance": balance,
    }))
}

/// There is no historical chain indexer in this host (live RPC integration
/// is an external collaborator, out of scope); this surfaces the closest
/// thing the host actually tracks — every pending-intent record, terminal
/// or not, touching `address` — rather than fabricating a block-range scan.
pub async fn get_transactions(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let address = required_str(&params, "address")?;
    let limit = clamp_limit(optional_i64(&params, "limit", 10));
    let offset = clamp_offset(optional_i64(&params, "offset", 0));

    let filter = IntentFilter {
        chain: None,
        address: Some(address.to_string()),
        intent_type: None,
    };
    let intents = ctx.pending_store.list(&filter, limit, offset);

    Ok(json!({
        "address": address,
        "transactions": intents,
    }))
}
