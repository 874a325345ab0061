//! DApp-originated intent ingestion: the one inbound method a browser page
//! can drive through the relay without ever holding a tool-call credential.
//!
//! `eth_sendTransaction` enqueues a [`PendingIntent`] awaiting an agent's
//! `approve_transaction`/`reject_transaction` decision; it never touches
//! the vault or broadcasts anything itself — that happens at approval time,
//! the same way `ahw_04_tool_registry::handlers::pending::approve_one`
//! signs and sends only once an intent has moved past `Pending`.
//!
//! Satisfying the cross-transport notification rule (two side effects,
//! both best-effort, neither allowed to fail the enclosing request) is why
//! this handler needs more than a [`ServiceContext`]: it also needs a
//! handle to the stdio writer, which no agent-facing tool handler do.

use ahw_01_stdio_transport::FramedWriter;
use ahw_02_router::registry::{handler_fn, MethodRegistry};
use ahw_04_tool_registry::params::required_str;
use ahw_04_tool_registry::ServiceContext;
use chrono::Utc;
use serde_json::{json, Value};
use shared_types::{ChainTag, Frame, HostError, IntentState, IntentType, PendingIntent, WalletEvent};
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// Bundles the handles a DApp-intent handler needs that a `ServiceContext`
/// alone does not carry: the stdio writer for the out-of-band
/// `ALGONIUS_PENDING_TRANSACTION` notification.
pub struct DappContext<W> {
    pub service: ServiceContext,
    pub writer: Arc<FramedWriter<W>>,
}

impl<W> Clone for DappContext<W> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            writer: Arc::clone(&self.writer),
        }
    }
}

/// Register the DApp-facing intent methods onto the stdio registry. Like
/// the privileged methods, these are never added to the HTTP-facing
/// `ToolRegistry`: a DApp speaks to the relay over stdio, not `tools/call`.
pub fn register<W>(registry: &mut MethodRegistry, ctx: DappContext<W>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let handler_ctx = ctx.clone();
    registry.register(
        "eth_sendTransaction",
        handler_fn(move |params| {
            let ctx = handler_ctx.clone();
            eth_send_transaction(params, ctx)
        }),
    );
}

/// Convert a `0x`-prefixed hex wei amount into the decimal-string,
/// whole-ether unit every other tool on this surface uses for `amount`.
fn hex_wei_to_decimal_ether(raw: &str) -> Result<String, HostError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| HostError::validation("value", "must be 0x-prefixed hex wei"))?;
    let wei =
        u128::from_str_radix(digits, 16).map_err(|_| HostError::validation("value", "not a valid hex integer"))?;

    const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return Ok(whole.to_string());
    }
    let frac_str = format!("{frac:018}");
    let trimmed = frac_str.trim_end_matches('0');
    Ok(format!("{whole}.{trimmed}"))
}

/// A locally-generated provisional transaction identifier. It is never a
/// real on-chain hash — the real broadcast only happens once an agent
/// approves the intent — but every tool on this surface (`get_pending_transactions`,
/// `approve_transaction`, `reject_transaction`) keys off this same id, the
/// same way `PendingIntent::id` doubles as "the transaction hash" for a
/// DApp-initiated transfer throughout its lifetime.
fn generate_provisional_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    format!("0x{}", hex::encode(bytes))
}

async fn eth_send_transaction<W>(params: Value, ctx: DappContext<W>) -> Result<Value, HostError>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let from = required_str(&params, "from")?;
    let to = required_str(&params, "to")?;
    let value = required_str(&params, "value")?;
    let amount = hex_wei_to_decimal_ether(value)?;

    let chain = "ethereum";
    let plugin = ctx
        .service
        .chain_registry
        .get_or_unsupported(chain)
        .map_err(ahw_04_tool_registry::chain_err::map_chain_error)?;

    let hash = generate_provisional_hash();
    let now = Utc::now();
    let intent = PendingIntent {
        id: hash.clone(),
        chain: ChainTag::normalize(chain),
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount: amount.clone(),
        token: "native".to_string(),
        intent_type: IntentType::Transfer,
        state: IntentState::Pending,
        submission_origin: "dapp".to_string(),
        submitted_at: now,
        last_checked_at: now,
        priority: 1,
        estimated_confirmation_secs: 30,
        required_confirmations: plugin.required_confirmations(),
        rejection: None,
    };
    ctx.service.pending_store.add(intent);

    // Both side effects below are best-effort per the cross-transport
    // notification rule: neither may fail the response already owed to
    // the DApp that submitted this intent.
    ctx.service.broadcaster.publish(WalletEvent::TransactionConfirmationNeeded {
        intent_id: hash.clone(),
        chain: chain.to_string(),
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount: amount.clone(),
    });

    let notification = Frame::Event(json!({
        "event": "ALGONIUS_PENDING_TRANSACTION",
        "transaction_hash": hash,
        "chain": chain,
        "from": from,
        "to": to,
        "amount": amount,
    }));
    if let Err(err) = ctx.writer.send(&notification).await {
        tracing::warn!(error = %err, "failed to emit ALGONIUS_PENDING_TRANSACTION notification");
    }

    Ok(json!({ "transaction_hash": hash }))
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
    use std::sync::Arc as StdArc;

    fn test_dapp_context() -> DappContext<Vec<u8>> {
        std::env::set_var("RUN_MODE", "test");
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ChainRegistry::new();
        registry.register("ethereum", StdArc::new(EvmPlugin::ethereum(vec![])));
        let service = ServiceContext::new(Vault::open(dir.path()), PendingStore::new(), AuditLog::new(), registry, EventBroadcaster::new());
        DappContext {
            service,
            writer: StdArc::new(FramedWriter::new(Vec::new())),
        }
    }

    #[test]
    fn hex_wei_converts_to_a_decimal_ether_string() {
        assert_eq!(hex_wei_to_decimal_ether("0x6f05b59d3b20000").unwrap(), "0.5");
        assert_eq!(hex_wei_to_decimal_ether("0xde0b6b3a7640000").unwrap(), "1");
    }

    #[tokio::test]
    async fn eth_send_transaction_enqueues_a_pending_intent_and_returns_its_hash() {
        let ctx = test_dapp_context();
        let result = eth_send_transaction(
            json!({
                "from": "0x742d35Cc6634C0532925a3b8D4C2B79C2b86A7A8",
                "to": "0x8ba1f109551bD432803012645Hac136c22C4F9B",
                "value": "0x6f05b59d3b20000",
            }),
            ctx.clone(),
        )
        .await
        .unwrap();

        let hash = result["transaction_hash"].as_str().unwrap().to_string();
        assert!(hash.starts_with("0x"));

        let intent = ctx.service.pending_store.get_by_id(&hash).unwrap();
        assert_eq!(intent.state, IntentState::Pending);
        assert_eq!(intent.intent_type, IntentType::Transfer);
        assert_eq!(intent.chain.as_str(), "ethereum");
        assert_eq!(intent.amount, "0.5");
    }

    #[tokio::test]
    async fn missing_from_is_a_validation_error() {
        let ctx = test_dapp_context();
        let err = eth_send_transaction(json!({"to": "0xdead", "value": "0x1"}), ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Validation { .. }));
    }
}
