//! `sign_message`: signs with the unlocked wallet's key, never broadcasts.

use crate::chain_err::map_chain_error;
use crate::context::ServiceContext;
use crate::params::{infer_chain_from_address, optional_bool, required_str};
use ahw_07_chain_abstraction::parse_sign_message_input;
use serde_json::{json, Value};
use shared_types::{AuditSource, HostError};

pub async fn sign_message(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let address = required_str(&params, "address")?;
    let message = required_str(&params, "message")?;
    let explicit_raw = optional_bool(&params, "is_raw_bytes", false);

    match ctx.unlocked_address().await {
        Some(unlocked) if unlocked.eq_ignore_ascii_case(address) => {}
        Some(_) | None => return Err(HostError::unauthorized()),
    }

    let (bytes, sentinel_raw) = parse_sign_message_input(message);
    let is_raw_bytes = explicit_raw || sentinel_raw;
    let payload: Vec<u8> = if is_raw_bytes { bytes } else { message.as_bytes().to_vec() };

    let chain = infer_chain_from_address(address);
    let plugin = match ctx.chain_registry.get_or_unsupported(chain) {
        Ok(plugin) => plugin,
        Err(err) => {
            audit_sign_failure(&ctx, address, &err.to_string());
            return Err(map_chain_error(err));
        }
    };

    let vault = ctx.vault.read().await;
    let material = match vault.unlocked() {
        Ok(material) => material,
        Err(_) => {
            drop(vault);
            audit_sign_failure(&ctx, address, "wallet locked mid-signature");
            return Err(HostError::unauthorized());
        }
    };

    let signed = match plugin.sign_message(material.private_key(), &payload) {
        Ok(signed) => signed,
        Err(err) => {
            let reason = err.to_string();
            drop(vault);
            audit_sign_failure(&ctx, address, &reason);
            return Err(map_chain_error(err));
        }
    };
    drop(vault);

    ctx.audit_log.append(
        "sign_message",
        address,
        format!("signed a {}-byte {} message", payload.len(), if is_raw_bytes { "raw" } else { "text" }),
        None,
        AuditSource::AiAgent,
        address,
    );

    Ok(json!({
        "address": address,
        "chain": chain,
        "signature": signed.signature,
        "public_key": signed.public_key,
        "is_raw_bytes": is_raw_bytes,
    }))
}

fn audit_sign_failure(ctx: &ServiceContext, address: &str, reason: &str) {
    ctx.audit_log.append(
        "sign_failed",
        address,
        format!("signing failed: {reason}"),
        None,
        AuditSource::AiAgent,
        address,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahw_05_pending_store::PendingStore;
    use ahw_06_vault::Vault;
    use ahw_07_chain_abstraction::plugins::evm::EvmPlugin;
    use ahw_07_chain_abstraction::ChainRegistry;
    use ahw_08_audit_log::AuditLog;
    use ahw_09_event_broadcaster::EventBroadcaster;
    use std::sync::Arc;

    async fn test_context_with_unlocked_wallet(address: &str) -> ServiceContext {
        std::env::set_var("RUN_MODE", "test");
        let dir = tempfile::tempdir().unwrap();
        let mut vault = Vault::open(dir.path());
        vault
            .create(address, "0xpub", b"pk", b"mnemonic", "pw", Default::default())
            .unwrap();
        vault.unlock("pw").unwrap();

        let mut registry = ChainRegistry::new();
        registry.register("ethereum", Arc::new(EvmPlugin::ethereum(vec![])));

        ServiceContext::new(vault, PendingStore::new(), AuditLog::new(), registry, EventBroadcaster::new())
    }

    #[tokio::test]
    async fn sign_message_for_the_unlocked_wallet_succeeds_and_is_audited_once() {
        let ctx = test_context_with_unlocked_wallet("0xowner").await;
        let result = sign_message(json!({"address": "0xowner", "message": "hello"}), ctx.clone())
            .await
            .unwrap();
        assert_eq!(result["is_raw_bytes"], false);
        assert!(result["signature"].as_str().unwrap().starts_with("0x"));
        assert_eq!(ctx.audit_log.len(), 1);
    }

    #[tokio::test]
    async fn sign_message_rejects_an_address_other_than_the_unlocked_wallet() {
        let ctx = test_context_with_unlocked_wallet("0xowner").await;
        let err = sign_message(json!({"address": "0xsomeoneelse", "message": "hello"}), ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Permission { .. }));
    }

    #[tokio::test]
    async fn sign_message_honors_the_solana_raw_bytes_sentinel() {
        let ctx = test_context_with_unlocked_wallet("0xowner").await;
        use base64::{engine::general_purpose::STANDARD, Engine};
        let encoded = STANDARD.encode(b"\x01\x02\x03");
        let message = format!("__SOLANA_RAW_BYTES__:{encoded}");
        let result = sign_message(json!({"address": "0xowner", "message": message}), ctx)
            .await
            .unwrap();
        assert_eq!(result["is_raw_bytes"], true);
    }
}
