//! # Transfer Flow Integration Tests
//!
//! Happy paths of the locked-transfer protocol, end to end on the runtime:
//!
//! 1. **Init and views**: a fresh ledger reports its supply and seeds the owner
//! 2. **Notified transfer**: sender → ledger → pool, deposit accepted, commit
//! 3. **Plain transfer**: `notify: false` settles in the send receipt itself
//! 4. **Synchronous success**: `send` reports success before the receiver has
//!    spoken, and the caller observes the final verdict through views

#[cfg(test)]
mod tests {
    use crate::harness::{ProtocolHarness, LEDGER, OWNER, POOL, SUPPLY};
    use promise_bus::events::{EventFilter, EventTopic, ProtocolEvent};

    // =============================================================================
    // INITIALIZATION AND VIEWS
    // =============================================================================

    /// A freshly initialized ledger reports the seeded supply through every view.
    #[tokio::test]
    async fn test_init_round_trip_through_views() {
        let harness = ProtocolHarness::standard().await;

        assert_eq!(harness.total_supply().await, SUPPLY);
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.balance("somebody-else").await, 0);
        assert_eq!(harness.locked_balance(OWNER).await, 0);
        assert_eq!(harness.rollback_count().await, 0);
        harness.assert_conserved();
    }

    // =============================================================================
    // NOTIFIED TRANSFERS
    // =============================================================================

    /// The canonical success story: the owner pays the pool, the pool accepts,
    /// and both contracts agree on the result.
    #[tokio::test]
    async fn test_notified_transfer_to_trusting_pool_commits() {
        let harness = ProtocolHarness::standard().await;

        let result = harness.send(OWNER, POOL, 5_000).await;
        assert!(result.is_success(), "send failed: {result:?}");

        assert_eq!(harness.balance(OWNER).await, 5_000);
        assert_eq!(harness.balance(POOL).await, 5_000);
        assert_eq!(harness.locked_balance(OWNER).await, 0, "lock must be released");
        assert_eq!(harness.pool_total_received().await, 5_000);
        assert_eq!(harness.rollback_count().await, 0);
        harness.assert_conserved();
    }

    /// A committed transfer walks Locked → NotifyDispatched → Committed and the
    /// pool reports the deposit, in that order on the bus.
    #[tokio::test]
    async fn test_successful_transfer_event_sequence() {
        let harness = ProtocolHarness::standard().await;
        let mut sub = harness
            .runtime
            .subscribe(EventFilter::topics(vec![
                EventTopic::Transfers,
                EventTopic::Deposits,
            ]));

        harness.send(OWNER, POOL, 1_234).await;

        let events = sub.drain();
        let kinds: Vec<&str> = events
            .iter()
            .map(|event| match event {
                ProtocolEvent::TransferLocked { amount, .. } => {
                    assert_eq!(*amount, 1_234);
                    "locked"
                }
                ProtocolEvent::TransferNotifyDispatched { .. } => "dispatched",
                ProtocolEvent::DepositAccepted { ledger, amount, .. } => {
                    assert_eq!(ledger.as_str(), LEDGER);
                    assert_eq!(*amount, 1_234);
                    "deposit"
                }
                ProtocolEvent::TransferCommitted { amount, .. } => {
                    assert_eq!(*amount, 1_234);
                    "committed"
                }
                other => panic!("unexpected event on transfer topics: {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["locked", "dispatched", "deposit", "committed"]);

        // The same transfer id runs through the whole sequence.
        let ids: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                ProtocolEvent::TransferLocked { transfer_id, .. }
                | ProtocolEvent::TransferNotifyDispatched { transfer_id, .. }
                | ProtocolEvent::TransferCommitted { transfer_id, .. } => Some(*transfer_id),
                _ => None,
            })
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }

    // =============================================================================
    // PLAIN TRANSFERS
    // =============================================================================

    /// `notify: false` moves funds in the send receipt itself; nothing stays
    /// locked and no notification receipt is scheduled.
    #[tokio::test]
    async fn test_plain_send_settles_directly() {
        let harness = ProtocolHarness::standard().await;
        let mut sub = harness
            .runtime
            .subscribe(EventFilter::topics(vec![EventTopic::Transfers]));

        let result = harness.send_plain(OWNER, "alice", 3_000).await;
        assert!(result.is_success(), "plain send failed: {result:?}");

        assert_eq!(harness.balance(OWNER).await, 7_000);
        assert_eq!(harness.balance("alice").await, 3_000);
        assert_eq!(harness.locked_balance(OWNER).await, 0);

        let events = sub.drain();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ProtocolEvent::TransferNotifyDispatched { .. })),
            "a plain transfer must not dispatch a notification"
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, ProtocolEvent::TransferCommitted { .. })));
        harness.assert_conserved();
    }

    /// The opaque message rides the notification end to end: what the sender
    /// attached is what the receiver's `on_token_received` sees, byte for byte.
    #[tokio::test]
    async fn test_message_payload_reaches_receiver() {
        let harness = ProtocolHarness::standard().await;
        let recorder = harness.deploy_recorder("recorder").await;

        let result = harness
            .execute(
                OWNER,
                LEDGER,
                shared_types::methods::ledger::SEND,
                serde_json::json!({
                    "new_owner_id": "recorder",
                    "amount": "250",
                    "message": hex::encode(b"for the pool"),
                }),
            )
            .await;
        assert!(result.is_success(), "send failed: {result:?}");

        let deposits = recorder.deposits();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].sender_id.as_str(), OWNER);
        assert_eq!(deposits[0].amount, 250);
        assert_eq!(deposits[0].message, b"for the pool");
        assert_eq!(harness.balance("recorder").await, 250);
    }

    /// Sending funds out and back leaves both parties where they started.
    #[tokio::test]
    async fn test_back_and_forth_restores_balances() {
        let harness = ProtocolHarness::standard().await;

        harness.send_plain(OWNER, "alice", 4_000).await;
        harness.send_plain("alice", OWNER, 4_000).await;

        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.balance("alice").await, 0);
        assert_eq!(harness.total_supply().await, SUPPLY);
        harness.assert_conserved();
    }

    // =============================================================================
    // SYNCHRONOUS SUCCESS, ASYNCHRONOUS VERDICT
    // =============================================================================

    /// `send` reports success once the funds are locked and the notification is
    /// scheduled. The pool's rejection arrives later, in the callback receipt,
    /// and the caller observes it through views, never through the send result.
    #[tokio::test]
    async fn test_send_succeeds_even_when_transfer_later_rolls_back() {
        let harness = ProtocolHarness::deploy().await;
        harness.initialize_ledger(OWNER, SUPPLY).await;
        // The pool trusts a different ledger, so the deposit will be refused.
        harness.initialize_pool_against("some-other-token").await;

        let result = harness.send(OWNER, POOL, 5_000).await;

        assert!(
            result.is_success(),
            "send reports success at lock time, not at settlement: {result:?}"
        );
        assert_eq!(harness.rollback_count().await, 1, "the verdict was a rollback");
        assert_eq!(harness.balance(OWNER).await, SUPPLY, "funds restored");
        assert_eq!(harness.balance(POOL).await, 0);
        harness.assert_conserved();
    }
}
