//! Populates the [`ChainRegistry`] with the two chain families this host
//! speaks. Kept outside `ahw-07-chain-abstraction` itself so that crate's
//! already-tested public surface (one plug-in per chain family, a bare
//! registry with `register`/`resolve`) never has to know about the
//! specific set of chains a deployment wants.

use ahw_07_chain_abstraction::{plugins::evm::EvmPlugin, plugins::solana::SolanaPlugin, ChainRegistry};
use std::sync::Arc;

/// Endpoint pools are read from the environment so a deployment can point
/// at its own RPC providers without a code change; `RUN_MODE=test`
/// (honored inside `EndpointManager::from_env`) overrides all of this with
/// deterministic mock responses regardless of what is configured here.
fn endpoints_from_env(var: &str, default: &str) -> Vec<String> {
    std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[must_use]
pub fn standard_registry() -> ChainRegistry {
    let mut registry = ChainRegistry::new();

    let ethereum_endpoints = endpoints_from_env("ALGONIUS_ETH_ENDPOINTS", "https://eth.llamarpc.com");
    registry.register("ethereum", Arc::new(EvmPlugin::ethereum(ethereum_endpoints)));

    let bsc_endpoints = endpoints_from_env("ALGONIUS_BSC_ENDPOINTS", "https://bsc-dataseed.binance.org");
    registry.register("bsc", Arc::new(EvmPlugin::bsc(bsc_endpoints)));

    let solana_endpoints = endpoints_from_env("ALGONIUS_SOL_ENDPOINTS", "https://api.mainnet-beta.solana.com");
    registry.register("solana", Arc::new(SolanaPlugin::solana(solana_endpoints)));

    registry
}
