//! `get_pending_transactions`, `approve_transaction`, `reject_transaction`.
//!
//! Approval and rejection share one invariant: each affected intent gets
//! exactly one audit entry before the handler returns, regardless of how
//! many intents a comma-separated batch touches.

use crate::chain_err::map_chain_error;
use crate::context::ServiceContext;
use crate::params::{optional_bool, optional_i64, optional_str, required_str, split_ids};
use ahw_05_pending_store::{RejectMetadata, TransitionError};
use serde_json::{json, Value};
use shared_types::{
    clamp_limit, clamp_offset, AuditSource, ChainTag, HostError, IntentFilter, IntentState,
    IntentType, RejectionReason, WalletEvent,
};

pub async fn get_pending_transactions(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let limit = clamp_limit(optional_i64(&params, "limit", 10));
    let offset = clamp_offset(optional_i64(&params, "offset", 0));

    let intent_type = match optional_str(&params, "transaction_type") {
        Some("transfer") => Some(IntentType::Transfer),
        Some("swap") => Some(IntentType::Swap),
        Some("contract") => Some(IntentType::Contract),
        Some("sign") => Some(IntentType::Sign),
        Some(other) => return Err(HostError::validation("transaction_type", format!("unknown type `{other}`"))),
        None => None,
    };

    let filter = IntentFilter {
        chain: optional_str(&params, "chain").map(ChainTag::normalize),
        address: optional_str(&params, "address").map(ToString::to_string),
        intent_type,
    };

    let intents = ctx.pending_store.list(&filter, limit, offset);
    Ok(json!({ "transactions": intents }))
}

fn transition_error_message(err: &TransitionError) -> &'static str {
    match err {
        TransitionError::NotFound => "not found",
        TransitionError::AlreadyRejected => "transaction already rejected",
        TransitionError::CannotRejectConfirmed => "cannot reject confirmed",
        TransitionError::Unauthorized => "unauthorized",
    }
}

/// Approve a single intent: ownership-checked transition to `Approved`,
/// then an attempt to sign and broadcast through the chain plugin, landing
/// on `Confirmed` or `Failed`. Exactly one audit entry is written for the
/// intent regardless of which of those two outcomes occurs.
async fn approve_one(ctx: &ServiceContext, id: &str) -> Value {
    let owner = ctx.unlocked_address().await;
    let owner = match owner.as_deref() {
        Some(addr) => addr,
        None => {
            return json!({"transaction_hash": id, "success": false, "error_message": "wallet is locked"});
        }
    };

    let approved = match ctx
        .pending_store
        .transition(id, IntentState::Approved, Some(owner), None)
    {
        Ok(intent) => intent,
        Err(err) => {
            return json!({
                "transaction_hash": id,
                "success": false,
                "error_message": transition_error_message(&err),
            });
        }
    };

    let outcome = sign_and_send(ctx, &approved).await;
    let (final_state, detail) = match &outcome {
        Ok(hash) => (IntentState::Confirmed, format!("broadcast as {hash}")),
        Err(err) => (IntentState::Failed, err.to_string()),
    };

    let _ = ctx.pending_store.transition(id, final_state, None, None);
    let action = match &outcome {
        Ok(_) => "transaction_approval",
        Err(_) => "sign_failed",
    };
    let audit_id = ctx.audit_log.append(
        action,
        id,
        &detail,
        None,
        AuditSource::AiAgent,
        owner,
    );
    ctx.broadcaster.publish(WalletEvent::TransactionStatusChanged {
        intent_id: id.to_string(),
        previous_state: IntentState::Approved,
        new_state: final_state,
    });

    match outcome {
        Ok(hash) => json!({
            "transaction_hash": id,
            "success": true,
            "broadcast_hash": hash,
            "audit_log_id": audit_id,
        }),
        Err(err) => json!({
            "transaction_hash": id,
            "success": false,
            "error_message": err.to_string(),
            "audit_log_id": audit_id,
        }),
    }
}

async fn sign_and_send(
    ctx: &ServiceContext,
    intent: &shared_types::PendingIntent,
) -> Result<String, HostError> {
    let plugin = ctx
        .chain_registry
        .get_or_unsupported(intent.chain.as_str())
        .map_err(map_chain_error)?;
    let vault = ctx.vault.read().await;
    let material = vault.unlocked().map_err(|_| HostError::unauthorized())?;
    plugin
        .send_transaction(material.private_key(), &intent.to_address, &intent.amount)
        .await
        .map_err(map_chain_error)
}

/// Ownership-checked rejection: the invariant that a rejected intent's
/// from-address must equal the currently-unlocked wallet's address is
/// enforced the same way `approve_one` enforces it, by passing the
/// unlocked address as `acting_address` into the store's transition.
async fn reject_one(ctx: &ServiceContext, id: &str, reason: RejectionReason, details: Option<&str>) -> Value {
    let owner = ctx.unlocked_address().await;
    let owner = match owner.as_deref() {
        Some(addr) => addr,
        None => {
            return json!({"transaction_hash": id, "success": false, "error_message": "wallet is locked"});
        }
    };

    let audit_id = ctx.audit_log.append(
        "transaction_rejection",
        id,
        details.unwrap_or("rejected by agent"),
        Some(reason.as_str().to_string()),
        AuditSource::AiAgent,
        owner,
    );
    let meta = RejectMetadata {
        reason,
        details: details.map(ToString::to_string),
        audit_log_id: audit_id.clone(),
    };

    match ctx
        .pending_store
        .transition(id, IntentState::Rejected, Some(owner), Some(meta))
    {
        Ok(intent) => {
            ctx.broadcaster.publish(WalletEvent::TransactionStatusChanged {
                intent_id: id.to_string(),
                previous_state: IntentState::Pending,
                new_state: IntentState::Rejected,
            });
            json!({
                "transaction_hash": id,
                "success": true,
                "rejected_at": intent.rejection.as_ref().map(|r| r.rejected_at.to_rfc3339()),
                "audit_log_id": audit_id,
            })
        }
        Err(err) => json!({
            "transaction_hash": id,
            "success": false,
            "error_message": transition_error_message(&err),
        }),
    }
}

pub async fn approve_transaction(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let raw_ids = optional_str(&params, "transaction_ids")
        .or_else(|| optional_str(&params, "transaction_hash"))
        .ok_or_else(|| HostError::validation("transaction_ids", "required"))?;
    let ids = split_ids(raw_ids);
    if ids.is_empty() {
        return Err(HostError::validation("transaction_ids", "must name at least one transaction"));
    }

    let action = optional_str(&params, "action").unwrap_or("approve");

    let mut results = Vec::with_capacity(ids.len());
    let (success_key, failure_key) = if action == "reject" {
        let reason = RejectionReason::parse(required_str(&params, "reason")?)
            .ok_or_else(|| HostError::validation("reason", format!("must be one of {:?}", RejectionReason::ALL)))?;
        let details = optional_str(&params, "details");
        for id in &ids {
            results.push(reject_one(&ctx, id, reason, details).await);
        }
        ("successfully_rejected", "failed_to_reject")
    } else {
        for id in &ids {
            results.push(approve_one(&ctx, id).await);
        }
        ("successfully_approved", "failed_to_approve")
    };

    Ok(summarize(ids.len(), results, success_key, failure_key))
}

pub async fn reject_transaction(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let raw_ids = required_str(&params, "transaction_ids")?;
    let ids = split_ids(raw_ids);
    if ids.is_empty() {
        return Err(HostError::validation("transaction_ids", "must name at least one transaction"));
    }
    let reason = RejectionReason::parse(required_str(&params, "reason")?)
        .ok_or_else(|| HostError::validation("reason", format!("must be one of {:?}", RejectionReason::ALL)))?;
    let details = optional_str(&params, "details");
    let _notify_user = optional_bool(&params, "notify_user", false);
    let _audit_log = optional_bool(&params, "audit_log", true);

    let mut results = Vec::with_capacity(ids.len());
    for id in &ids {
        results.push(reject_one(&ctx, id, reason, details).await);
    }
    Ok(summarize(ids.len(), results, "successfully_rejected", "failed_to_reject"))
}

fn summarize(total: usize, results: Vec<Value>, success_key: &str, failure_key: &str) -> Value {
    let succeeded = results.iter().filter(|r| r["success"] == json!(true)).count();
    let mut summary = serde_json::Map::new();
    summary.insert("total_processed".to_string(), json!(total));
    summary.insert(success_key.to_string(), json!(succeeded));
    summary.insert(failure_key.to_string(), json!(total - succeeded));
    json!({
        "summary": Value::Object(summary),
        "individual_results": results,
    })
}
