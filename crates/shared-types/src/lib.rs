//! # Shared Types
//!
//! Domain entities and wire-protocol types shared across the wallet host's
//! component crates.
//!
//! - **Single source of truth**: wallet record, pending intent, audit entry,
//!   tool descriptor and the JSON-RPC-style envelope are all defined once,
//!   here, and re-exported by every crate that needs them.
//! - **No transport coupling**: nothing in this crate knows whether it was
//!   read from stdio or HTTP.

pub mod audit;
pub mod chain;
pub mod envelope;
pub mod errors;
pub mod events;
pub mod intent;
pub mod tool;
pub mod wallet_record;

pub use audit::{AuditEntry, AuditSource};
pub use chain::ChainTag;
pub use envelope::{codes, Frame, RpcError, RpcRequest, RpcResponse};
pub use errors::HostError;
pub use events::WalletEvent;
pub use intent::{clamp_limit, clamp_offset, IntentFilter, IntentState, IntentType, PendingIntent, RejectionReason};
pub use tool::ToolDescriptor;
pub use wallet_record::{EncryptedBlob, WalletRecord};
