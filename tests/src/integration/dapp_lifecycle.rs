//! End-to-end DApp-intent lifecycle: enqueue, agent discovery by polling,
//! approve-and-sign, reject, and the ownership/state-machine invariants
//! around all three, driven through the same public APIs `wallet-host`
//! wires together (`ahw-05-pending-store`, `ahw-06-vault`,
//! `ahw-07-chain-abstraction`, `ahw-08-audit-log`,
//! `ahw-09-event-broadcaster`, `ahw-04-tool-registry`).

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::unlocked_context;
    use ahw_04_tool_registry::handlers::{pending, sign};
    use chrono::Utc;
    use serde_json::json;
    use shared_types::{ChainTag, IntentState, IntentType, PendingIntent};

    fn sample_intent(id: &str, from: &str, chain: &str) -> PendingIntent {
        PendingIntent {
            id: id.to_string(),
            chain: ChainTag::normalize(chain),
            from_address: from.to_string(),
            to_address: "0x8ba1f109551bD432803012645Hac136c22C4F9B".to_string(),
            amount: "0.5".to_string(),
            token: "native".to_string(),
            intent_type: IntentType::Transfer,
            state: IntentState::Pending,
            submission_origin: "dapp".to_string(),
            submitted_at: Utc::now(),
            last_checked_at: Utc::now(),
            priority: 1,
            estimated_confirmation_secs: 30,
            required_confirmations: 6,
            rejection: None,
        }
    }

    /// A DApp-originated intent becomes visible to an agent purely by
    /// polling `get_pending_transactions`, and the broadcaster fires the
    /// confirmation-needed event exactly once — it never pushes to the
    /// agent side, only to whichever consumer subscribed (here nobody, by
    /// design: agents have no push channel at all).
    #[tokio::test]
    async fn a_dapp_intent_is_discoverable_by_polling_and_then_confirmable() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;

        let mut subscriber = ctx.broadcaster.subscribe();
        ctx.pending_store.add(sample_intent("0xhash1", "0xOwner", "ethereum"));
        ctx.broadcaster.publish(shared_types::WalletEvent::TransactionConfirmationNeeded {
            intent_id: "0xhash1".to_string(),
            chain: "ethereum".to_string(),
            from_address: "0xOwner".to_string(),
            to_address: "0x8ba1f109551bD432803012645Hac136c22C4F9B".to_string(),
            amount: "0.5".to_string(),
        });

        let event = subscriber.try_recv().expect("one event was published");
        assert_eq!(event.name(), "transaction_confirmation_needed");

        let listed = pending::get_pending_transactions(
            json!({"chain": "ethereum", "limit": 10}),
            ctx.clone(),
        )
        .await
        .unwrap();
        let transactions = listed["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["id"], "0xhash1");
        assert_eq!(transactions[0]["state"], "pending");

        let approved = pending::approve_transaction(json!({"transaction_ids": "0xhash1"}), ctx.clone())
            .await
            .unwrap();
        assert_eq!(approved["summary"]["successfully_approved"], 1);
        assert_eq!(ctx.pending_store.get_by_id("0xhash1").unwrap().state, IntentState::Confirmed);
        assert_eq!(ctx.audit_log.by_subject("0xhash1").len(), 1);
        assert_eq!(ctx.audit_log.by_subject("0xhash1")[0].action, "transaction_approval");
    }

    /// Re-rejecting an already-rejected intent reports the specific
    /// `already rejected` failure, not a generic error, and a second
    /// reject attempt writes no additional audit entry for an already
    /// terminal intent's successful half.
    #[tokio::test]
    async fn rejecting_twice_surfaces_the_specific_already_rejected_reason() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        ctx.pending_store.add(sample_intent("0xhash2", "0xOwner", "ethereum"));

        let first = pending::reject_transaction(
            json!({"transaction_ids": "0xhash2", "reason": "suspicious_activity"}),
            ctx.clone(),
        )
        .await
        .unwrap();
        assert_eq!(first["summary"]["successfully_rejected"], 1);
        assert!(first["individual_results"][0]["audit_log_id"].as_str().unwrap().starts_with("audit_"));

        let second = pending::reject_transaction(
            json!({"transaction_ids": "0xhash2", "reason": "suspicious_activity"}),
            ctx.clone(),
        )
        .await
        .unwrap();
        assert_eq!(second["summary"]["failed_to_reject"], 1);
        assert_eq!(
            second["individual_results"][0]["error_message"],
            "transaction already rejected"
        );

        // Exactly one audit entry from the first (successful) attempt —
        // the failed retry never reaches `AuditLog::append`.
        assert_eq!(ctx.audit_log.by_subject("0xhash2").len(), 1);
    }

    /// The ownership invariant: no agent-initiated transition succeeds
    /// unless the intent's from-address equals the currently-unlocked
    /// wallet's address, and a mismatch leaves the intent untouched.
    #[tokio::test]
    async fn approving_someone_elses_intent_is_refused_and_leaves_it_pending() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        ctx.pending_store.add(sample_intent("0xhash3", "0xSomeoneElse", "ethereum"));

        let result = pending::approve_transaction(json!({"transaction_ids": "0xhash3"}), ctx.clone())
            .await
            .unwrap();
        assert_eq!(result["summary"]["failed_to_approve"], 1);
        assert_eq!(ctx.pending_store.get_by_id("0xhash3").unwrap().state, IntentState::Pending);
    }

    /// A batch `approve_transaction` call touching a mix of a valid and an
    /// unknown id returns one result per id, with the correct totals.
    #[tokio::test]
    async fn batch_approve_reports_a_per_id_result_and_an_accurate_summary() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        ctx.pending_store.add(sample_intent("0xhash4", "0xOwner", "ethereum"));

        let result = pending::approve_transaction(
            json!({"transaction_ids": "0xhash4,0xdoes-not-exist"}),
            ctx.clone(),
        )
        .await
        .unwrap();
        assert_eq!(result["summary"]["total_processed"], 2);
        assert_eq!(result["summary"]["successfully_approved"], 1);
        assert_eq!(result["summary"]["failed_to_approve"], 1);

        let results = result["individual_results"].as_array().unwrap();
        assert_eq!(results[0]["transaction_hash"], "0xhash4");
        assert_eq!(results[0]["success"], true);
        assert_eq!(results[1]["transaction_hash"], "0xdoes-not-exist");
        assert_eq!(results[1]["success"], false);
    }

    /// `sign_message` and the pending-intent path share one vault: a
    /// signature for the unlocked wallet's own address succeeds, and the
    /// audit log accumulates entries from both flows side by side.
    #[tokio::test]
    async fn signing_and_approving_both_land_in_the_same_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = unlocked_context(dir.path(), "0xOwner", "pw").await;
        ctx.pending_store.add(sample_intent("0xhash5", "0xOwner", "ethereum"));

        sign::sign_message(json!({"address": "0xOwner", "message": "hello"}), ctx.clone())
            .await
            .unwrap();
        pending::approve_transaction(json!({"transaction_ids": "0xhash5"}), ctx.clone())
            .await
            .unwrap();

        assert_eq!(ctx.audit_log.len(), 2);
    }
}
