mod crypto_roundtrip;
mod dapp_lifecycle;
mod protocol_surface;
mod vault_lifecycle;

/// Shared fixtures used by more than one integration module.
pub(crate) mod fixtures {
    use ahw_04_tool_registry::ServiceContext;
    use ahw_05_pending_store::PendingStore;
    use ahw_06_vault::Vault;
    use ahw_07_chain_abstraction::plugins::evm::EvmPlugin;
    use ahw_07_chain_abstraction::plugins::solana::SolanaPlugin;
    use ahw_07_chain_abstraction::ChainRegistry;
    use ahw_08_audit_log::AuditLog;
    use ahw_09_event_broadcaster::EventBroadcaster;
    use std::sync::Arc;

    /// A `ChainRegistry` wired with the same aliases `wallet-host::chains`
    /// registers, all running in mock mode (`RUN_MODE=test`).
    pub fn standard_chain_registry() -> ChainRegistry {
        std::env::set_var("RUN_MODE", "test");
        let mut registry = ChainRegistry::new();
        registry.register("ethereum", Arc::new(EvmPlugin::ethereum(vec![])));
        registry.register("eth", Arc::new(EvmPlugin::ethereum(vec![])));
        registry.register("bsc", Arc::new(EvmPlugin::bsc(vec![])));
        registry.register("binance", Arc::new(EvmPlugin::bsc(vec![])));
        registry.register("solana", Arc::new(SolanaPlugin::solana(vec![])));
        registry.register("sol", Arc::new(SolanaPlugin::solana(vec![])));
        registry
    }

    /// A `ServiceContext` with a wallet created and unlocked at `address`,
    /// backed by a fresh temp directory, in mock chain-I/O mode.
    pub async fn unlocked_context(dir: &std::path::Path, address: &str, password: &str) -> ServiceContext {
        let mut vault = Vault::open(dir);
        vault
            .create(address, "0xpub", b"private-key-bytes", b"twelve word recovery phrase", password, Default::default())
            .unwrap();
        vault.unlock(password).unwrap();

        ServiceContext::new(
            vault,
            PendingStore::new(),
            AuditLog::new(),
            standard_chain_registry(),
            EventBroadcaster::new(),
        )
    }
}
