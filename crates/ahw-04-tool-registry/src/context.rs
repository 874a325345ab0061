//! `ServiceContext`: the shared, cloneable handle bundle every tool
//! handler closes over.

use ahw_05_pending_store::PendingStore;
use ahw_06_vault::Vault;
use ahw_07_chain_abstraction::ChainRegistry;
use ahw_08_audit_log::AuditLog;
use ahw_09_event_broadcaster::EventBroadcaster;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The vault guards its decrypted material behind a single write lock;
/// signing operations take a short-lived read borrow, unlock/lock/create
/// take the write lock.
#[derive(Clone)]
pub struct ServiceContext {
    pub vault: Arc<RwLock<Vault>>,
    pub pending_store: Arc<PendingStore>,
    pub audit_log: Arc<AuditLog>,
    pub chain_registry: Arc<ChainRegistry>,
    pub broadcaster: Arc<EventBroadcaster>,
}

impl ServiceContext {
    #[must_use]
    pub fn new(
        vault: Vault,
        pending_store: PendingStore,
        audit_log: AuditLog,
        chain_registry: ChainRegistry,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            vault: Arc::new(RwLock::new(vault)),
            pending_store: Arc::new(pending_store),
            audit_log: Arc::new(audit_log),
            chain_registry: Arc::new(chain_registry),
            broadcaster: Arc::new(broadcaster),
        }
    }

    /// The currently-unlocked wallet's address, if any. Tool handlers use
    /// this for the ownership check rather than trusting a caller-supplied
    /// address.
    pub async fn unlocked_address(&self) -> Option<String> {
        let vault = self.vault.read().await;
        if vault.is_unlocked() {
            vault.address().map(ToString::to_string)
        } else {
            None
        }
    }
}
