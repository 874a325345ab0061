//! `HostConfig` (C12): every environment-resolved knob the supervisor
//! needs, split into per-surface sections each with their own `Default`
//! impl and a `validate()` pass run once at start-up.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rate limit requests-per-second and burst size must both be non-zero")]
    ZeroRateLimit,

    #[error("outbound request timeout must be non-zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct StdioConfig {
    pub enabled: bool,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { bind_addr: default_sse_bind() }
    }
}

fn default_sse_bind() -> String {
    let port = std::env::var("SSE_PORT").unwrap_or_else(|_| "9444".to_string());
    format!("127.0.0.1:{port}")
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub bind_addr: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { bind_addr: default_admin_bind() }
    }
}

fn default_admin_bind() -> String {
    let port = std::env::var("ALGONIUS_ADMIN_PORT").unwrap_or_else(|_| "9445".to_string());
    format!("127.0.0.1:{port}")
}

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub wallet_home: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self { wallet_home: default_wallet_home() }
    }
}

fn default_wallet_home() -> PathBuf {
    match std::env::var("ALGONIUS_WALLET_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs_home().join(".algonius-wallet"),
    }
}

/// A minimal home-directory lookup; the workspace otherwise has no reason
/// to depend on the `dirs` crate for a single call site.
fn dirs_home() -> PathBuf {
    std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: ahw_04_tool_registry::DEFAULT_REQUESTS_PER_SECOND,
            burst_size: ahw_04_tool_registry::DEFAULT_BURST_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub outbound_request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { outbound_request_ms: 5000 }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

/// The full set of environment-resolved knobs the supervisor needs to
/// start every component. Resolved once at start-up; nothing downstream
/// re-reads the environment.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub stdio: StdioConfig,
    pub http: HttpConfig,
    pub admin: AdminConfig,
    pub vault: VaultConfig,
    pub rate_limit: RateLimitConfig,
    pub timeout: TimeoutConfig,
    pub logging: LoggingConfig,
}

impl HostConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Reject an obviously broken configuration before anything is wired
    /// up, the same way `GatewayConfig::validate()` front-loads its sanity
    /// checks rather than letting a zero rate limit surface as a confusing
    /// runtime symptom later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.requests_per_second == 0 || self.rate_limit.burst_size == 0 {
            return Err(ConfigError::ZeroRateLimit);
        }
        if self.timeout.outbound_request_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
