//! Round-robin outbound endpoint failover, with a deterministic mock
//! substitute for `RUN_MODE=test`.

use crate::errors::ChainError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Selects among a fixed pool of RPC endpoints, advancing past any
/// endpoint that errors rather than retrying it immediately.
pub struct EndpointManager {
    endpoints: Vec<String>,
    cursor: AtomicUsize,
    mock_mode: bool,
}

impl EndpointManager {
    #[must_use]
    pub fn new(endpoints: Vec<String>, mock_mode: bool) -> Self {
        Self {
            endpoints,
            cursor: AtomicUsize::new(0),
            mock_mode,
        }
    }

    /// Construct from the `RUN_MODE` environment convention: `RUN_MODE=test`
    /// forces mock responses regardless of configured endpoints.
    #[must_use]
    pub fn from_env(endpoints: Vec<String>) -> Self {
        let mock_mode = std::env::var("RUN_MODE").as_deref() == Ok("test");
        Self::new(endpoints, mock_mode)
    }

    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.mock_mode
    }

    /// Pick the next endpoint in round-robin order.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Network`] if no endpoints are configured.
    pub fn next_endpoint(&self) -> Result<&str, ChainError> {
        if self.endpoints.is_empty() {
            return Err(ChainError::Network {
                message: "no endpoints configured".to_string(),
                retry_suggested: false,
            });
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.endpoints.len();
        Ok(&self.endpoints[idx])
    }
}
