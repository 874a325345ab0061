//! The five wallet-lifecycle methods: `create_wallet`, `import_wallet`,
//! `unlock_wallet`, `lock_wallet`, `wallet_status`.
//!
//! These never touch a [`ahw_04_tool_registry::ToolRegistry`] — they are
//! registered directly onto the stdio-side [`MethodRegistry`] by
//! [`crate::stdio::build_registry`], so an agent reaching them through
//! `tools/call` gets method-not-found rather than key material.

use ahw_02_router::registry::{handler_fn, MethodRegistry};
use ahw_04_tool_registry::ServiceContext;
use ahw_06_vault::VaultError;
use serde_json::{json, Value};
use shared_types::{codes, AuditSource, ChainTag, HostError, WalletEvent};
use std::collections::BTreeMap;

/// Register all five privileged methods onto `registry`, each closing over
/// its own clone of `ctx`. The companion agent-facing tools are registered
/// separately by `ahw_04_tool_registry::handlers::register_all` — this
/// function only ever touches the stdio-side registry.
pub fn register(registry: &mut MethodRegistry, ctx: ServiceContext) {
    macro_rules! register {
        ($name:expr, $handler:expr) => {{
            let ctx = ctx.clone();
            registry.register($name, handler_fn(move |params| {
                let ctx = ctx.clone();
                $handler(params, ctx)
            }));
        }};
    }

    register!("create_wallet", create_wallet);
    register!("import_wallet", import_wallet);
    register!("unlock_wallet", unlock_wallet);
    register!("lock_wallet", lock_wallet);
    register!("wallet_status", wallet_status);
}

/// `VaultError` has no code of its own; it collapses onto the same
/// wallet-specific wire codes `map_chain_error` assigns for chain errors,
/// matching the `-32001` an incorrect-password unlock failure reports on
/// the wire. `NotFound` and `Locked` share that code too: from the
/// caller's side, all three are "this wallet operation failed," and the
/// wire protocol does not distinguish them further.
fn vault_error_to_host(err: VaultError) -> HostError {
    match err {
        VaultError::AlreadyExists(_) => HostError::WalletState {
            code: codes::WALLET_ALREADY_EXISTS,
            message: err.to_string(),
        },
        VaultError::Storage(message) => HostError::WalletState {
            code: codes::STORAGE_ENCRYPTION_FAILED,
            message,
        },
        VaultError::UnlockFailed | VaultError::NotFound | VaultError::Locked => HostError::WalletState {
            code: codes::INVALID_MNEMONIC,
            message: err.to_string(),
        },
    }
}

fn require_password(params: &Value) -> Result<&str, HostError> {
    ahw_04_tool_registry::params::required_str(params, "password")
}

/// A minimal length floor; the vault's own KDF iteration count is the real
/// defense against brute force, so this only rejects the obviously weak.
fn check_password_strength(password: &str) -> Result<(), HostError> {
    if password.len() < 8 {
        return Err(HostError::WalletState {
            code: codes::WEAK_PASSWORD,
            message: "password must be at least 8 characters".to_string(),
        });
    }
    Ok(())
}

async fn create_wallet(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let password = require_password(&params)?;
    check_password_strength(password)?;
    let chain = ahw_04_tool_registry::params::optional_str(&params, "chain").unwrap_or("ethereum");

    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(ahw_04_tool_registry::chain_err::map_chain_error)?;
    let created = plugin.create().map_err(ahw_04_tool_registry::chain_err::map_chain_error)?;

    let mut chains = BTreeMap::new();
    chains.insert(ChainTag::normalize(chain).as_str().to_string(), true);

    {
        let mut vault = ctx.vault.write().await;
        vault
            .create(
                &created.address,
                &created.public_key,
                &created.private_key,
                created.mnemonic.as_bytes(),
                password,
                chains,
            )
            .map_err(vault_error_to_host)?;
    }

    ctx.audit_log.append(
        "wallet_created",
        &created.address,
        format!("created a new {chain} wallet"),
        None,
        AuditSource::User,
        &created.address,
    );

    Ok(json!({
        "address": created.address,
        "publicKey": created.public_key,
        "mnemonic": created.mnemonic,
        "chain": chain,
    }))
}

async fn import_wallet(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let password = require_password(&params)?;
    check_password_strength(password)?;
    let mnemonic = ahw_04_tool_registry::params::required_str(&params, "mnemonic")?;
    let chain = ahw_04_tool_registry::params::optional_str(&params, "chain").unwrap_or("ethereum");
    let derivation_path = ahw_04_tool_registry::params::optional_str(&params, "derivation_path");

    let plugin = ctx.chain_registry.get_or_unsupported(chain).map_err(ahw_04_tool_registry::chain_err::map_chain_error)?;
    let imported = plugin
        .import_from_mnemonic(mnemonic, derivation_path)
        .map_err(ahw_04_tool_registry::chain_err::map_chain_error)?;

    let mut chains = BTreeMap::new();
    chains.insert(ChainTag::normalize(chain).as_str().to_string(), true);

    {
        let mut vault = ctx.vault.write().await;
        vault
            .create(
                &imported.address,
                &imported.public_key,
                &imported.private_key,
                imported.mnemonic.as_bytes(),
                password,
                chains,
            )
            .map_err(vault_error_to_host)?;
    }

    ctx.audit_log.append(
        "wallet_imported",
        &imported.address,
        format!("imported an existing {chain} wallet from a mnemonic"),
        None,
        AuditSource::User,
        &imported.address,
    );

    Ok(json!({
        "address": imported.address,
        "publicKey": imported.public_key,
        "chain": chain,
    }))
}

async fn unlock_wallet(params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let password = require_password(&params)?;

    let address = {
        let mut vault = ctx.vault.write().await;
        vault.unlock(password).map_err(vault_error_to_host)?;
        vault.address().map(ToString::to_string)
    };
    let address = address.ok_or_else(|| HostError::WalletState {
        code: codes::INVALID_MNEMONIC,
        message: "no wallet found".to_string(),
    })?;

    ctx.audit_log.append(
        "wallet_unlocked",
        &address,
        "wallet unlocked",
        None,
        AuditSource::User,
        &address,
    );
    ctx.broadcaster.publish(WalletEvent::WalletUnlocked { address: address.clone() });

    Ok(json!({ "unlocked": true, "address": address }))
}

async fn lock_wallet(_params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let address = {
        let mut vault = ctx.vault.write().await;
        let address = vault.address().map(ToString::to_string);
        vault.lock();
        address
    };

    if let Some(address) = &address {
        ctx.audit_log.append("wallet_locked", address, "wallet locked", None, AuditSource::User, address);
        ctx.broadcaster.publish(WalletEvent::WalletLocked { address: address.clone() });
    }

    Ok(json!({ "locked": true }))
}

async fn wallet_status(_params: Value, ctx: ServiceContext) -> Result<Value, HostError> {
    let vault = ctx.vault.read().await;
    Ok(json!({
        "hasWallet": vault.has_wallet(),
        "isUnlocked": vault.is_unlocked(),
        "address": vault.address(),
    }))
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

    fn test_context() -> ServiceContext {
        std::env::set_var("RUN_MODE", "test");
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ChainRegistry::new();
        registry.register("ethereum", Arc::new(EvmPlugin::ethereum(vec![])));
        ServiceContext::new(Vault::open(dir.path()), PendingStore::new(), AuditLog::new(), registry, EventBroadcaster::new())
    }

    #[tokio::test]
    async fn wallet_status_reports_no_wallet_initially() {
        let ctx = test_context();
        let status = wallet_status(json!({}), ctx).await.unwrap();
        assert_eq!(status["hasWallet"], false);
        assert_eq!(status["isUnlocked"], false);
    }

    #[tokio::test]
    async fn create_then_unlock_then_status_reports_unlocked() {
        let ctx = test_context();
        create_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();

        unlock_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();

        let status = wallet_status(json!({}), ctx).await.unwrap();
        assert_eq!(status["hasWallet"], true);
        assert_eq!(status["isUnlocked"], true);
        assert!(status["address"].as_str().unwrap().starts_with("0x"));
    }

    #[tokio::test]
    async fn wrong_password_unlock_reports_the_wallet_specific_code() {
        let ctx = test_context();
        create_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();

        let err = unlock_wallet(json!({"password": "not the password"}), ctx.clone())
            .await
            .unwrap_err();
        let rpc = err.into_rpc_error();
        assert_eq!(rpc.code, codes::INVALID_MNEMONIC);

        let status = wallet_status(json!({}), ctx).await.unwrap();
        assert_eq!(status["isUnlocked"], false);
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_touching_the_vault() {
        let ctx = test_context();
        let err = create_wallet(json!({"password": "short"}), ctx.clone()).await.unwrap_err();
        let rpc = err.into_rpc_error();
        assert_eq!(rpc.code, codes::WEAK_PASSWORD);
    }

    #[tokio::test]
    async fn creating_twice_reports_wallet_already_exists() {
        let ctx = test_context();
        create_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();
        let err = create_wallet(json!({"password": "another long password"}), ctx)
            .await
            .unwrap_err();
        let rpc = err.into_rpc_error();
        assert_eq!(rpc.code, codes::WALLET_ALREADY_EXISTS);
    }

    #[tokio::test]
    async fn lock_then_status_reports_locked_but_still_has_wallet() {
        let ctx = test_context();
        create_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();
        unlock_wallet(json!({"password": "correct horse battery staple"}), ctx.clone())
            .await
            .unwrap();

        lock_wallet(json!({}), ctx.clone()).await.unwrap();

        let status = wallet_status(json!({}), ctx).await.unwrap();
        assert_eq!(status["hasWallet"], true);
        assert_eq!(status["isUnlocked"], false);
    }
}
