//! Chain alias normalization.
//!
//! A chain tag is always stored normalized (lowercase, canonical name); the
//! registry in `ahw-07-chain-abstraction` maps case-insensitive aliases
//! (`ETH`, `ethereum`, `Ethereum`) onto one canonical tag before looking up
//! a plug-in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized chain identifier, e.g. `"ethereum"`, `"bsc"`, `"solana"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainTag(pub String);

impl ChainTag {
    /// Normalize an arbitrary alias into a canonical tag.
    ///
    /// Unknown aliases are lowercased and passed through unchanged; the
    /// chain registry is responsible for rejecting ones it does not
    /// recognize.
    #[must_use]
    pub fn normalize(alias: &str) -> Self {
        let lower = alias.trim().to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "eth" | "ethereum" => "ethereum",
            "bsc" | "binance" | "bnb" => "bsc",
            "sol" | "solana" => "solana",
            other => return ChainTag(other.to_string()),
        };
        ChainTag(canonical.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
