//! # Edge Case Integration Tests
//!
//! The corners of the protocol surface:
//!
//! 1. **Double initialization**: rejected no matter what arguments come second
//! 2. **Overspend**: fails in the send receipt itself; no lock, no receipts
//! 3. **Zero amounts**: a legal transfer that runs the full lifecycle
//! 4. **Self transfers**: permitted, net effect nil
//! 5. **Malformed input**: bad account ids and wrong JSON shapes

#[cfg(test)]
mod tests {
    use crate::harness::{ProtocolHarness, LEDGER, OWNER, POOL, SUPPLY};
    use promise_bus::call::{CallFailure, PromiseResult};
    use promise_bus::events::{EventFilter, EventTopic, ProtocolEvent};
    use serde_json::json;
    use shared_types::methods::ledger as ledger_methods;

    fn failure(result: &PromiseResult) -> &CallFailure {
        match result {
            PromiseResult::Failed(failure) => failure,
            PromiseResult::Succeeded(value) => panic!("expected failure, got {value}"),
        }
    }

    // =============================================================================
    // INITIALIZATION
    // =============================================================================

    /// Initializing twice fails even with identical or different arguments, and
    /// the state set by the first call survives untouched.
    #[tokio::test]
    async fn test_second_init_fails_regardless_of_arguments() {
        let harness = ProtocolHarness::standard().await;

        for args in [
            json!({ "owner_id": OWNER, "total_supply": SUPPLY.to_string() }),
            json!({ "owner_id": "usurper", "total_supply": "999999" }),
        ] {
            let result = harness
                .execute("deployer", LEDGER, ledger_methods::NEW, args)
                .await;
            let message = failure(&result).to_string();
            assert!(
                message.contains("Already initialized"),
                "got: {message}"
            );
        }

        assert_eq!(harness.total_supply().await, SUPPLY);
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.balance("usurper").await, 0);
    }

    /// Views on a deployed but uninitialized ledger fail rather than guessing.
    #[tokio::test]
    async fn test_views_before_init_fail() {
        let harness = ProtocolHarness::deploy().await;

        let result = harness
            .runtime
            .view(
                &crate::harness::account(LEDGER),
                ledger_methods::GET_TOTAL_SUPPLY,
                json!({}),
            )
            .await;
        assert!(result.is_err(), "uninitialized view must fail");
    }

    // =============================================================================
    // OVERSPEND
    // =============================================================================

    /// Spending more than the available balance fails synchronously in the send
    /// receipt. Nothing locks, nothing is scheduled, nothing rolls back.
    #[tokio::test]
    async fn test_overspend_fails_before_any_lock() {
        let harness = ProtocolHarness::standard().await;
        let mut sub = harness
            .runtime
            .subscribe(EventFilter::topics(vec![EventTopic::Transfers]));

        let result = harness.send(OWNER, POOL, SUPPLY + 1_000).await;

        let message = failure(&result).to_string();
        assert!(message.contains("Not enough balance"), "got: {message}");

        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.locked_balance(OWNER).await, 0);
        assert_eq!(harness.rollback_count().await, 0, "no transfer existed to roll back");
        assert_eq!(harness.pool_total_received().await, 0);
        assert!(
            sub.drain().is_empty(),
            "an overspend must not publish any transfer event"
        );
        harness.assert_conserved();
    }

    /// Locked funds do not count as spendable: two sends that each fit the
    /// total cannot both lock when the first is still pending.
    #[tokio::test]
    async fn test_locked_funds_are_not_spendable() {
        let harness = ProtocolHarness::standard().await;

        // First send locks 8000 and fails later (ghost receiver): during the
        // pending window only 2000 is available. Submit both before draining.
        harness.runtime.submit(
            crate::harness::account(OWNER),
            crate::harness::account(LEDGER),
            ledger_methods::SEND,
            json!({ "new_owner_id": "ghost", "amount": "8000" }),
        );
        let second = harness.runtime.submit(
            crate::harness::account(OWNER),
            crate::harness::account(LEDGER),
            ledger_methods::SEND,
            json!({ "new_owner_id": "alice", "amount": "8000", "notify": false }),
        );
        harness.runtime.run_until_settled().await.unwrap();

        let outcome = harness.runtime.outcome_of(second).expect("second send ran");
        let message = failure(&outcome).to_string();
        assert!(
            message.contains("Not enough balance"),
            "second send saw locked funds as spendable: {message}"
        );

        // After the ghost transfer rolled back, everything is home again.
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        harness.assert_conserved();
    }

    // =============================================================================
    // ZERO AMOUNTS
    // =============================================================================

    /// A zero-amount notified transfer is not a no-op: it locks zero, notifies
    /// the receiver, and commits, leaving a full event trail behind.
    #[tokio::test]
    async fn test_zero_amount_transfer_runs_full_cycle() {
        let harness = ProtocolHarness::standard().await;
        let mut sub = harness
            .runtime
            .subscribe(EventFilter::topics(vec![
                EventTopic::Transfers,
                EventTopic::Deposits,
            ]));

        let result = harness.send(OWNER, POOL, 0).await;
        assert!(result.is_success(), "zero is a legal amount: {result:?}");

        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.pool_total_received().await, 0);
        assert_eq!(harness.rollback_count().await, 0);

        let events = sub.drain();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ProtocolEvent::TransferCommitted { amount: 0, .. })),
            "the zero transfer leaves a committed event, unlike a call never made"
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, ProtocolEvent::DepositAccepted { amount: 0, .. })));
    }

    /// Zero-amount rollbacks count like any other rollback.
    #[tokio::test]
    async fn test_zero_amount_rollback_still_counts() {
        let harness = ProtocolHarness::standard().await;

        harness.send(OWNER, "ghost", 0).await;

        assert_eq!(harness.rollback_count().await, 1);
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
    }

    // =============================================================================
    // SELF TRANSFERS
    // =============================================================================

    /// Sending to yourself is allowed and nets out to nothing, with or without
    /// the notification protocol.
    #[tokio::test]
    async fn test_self_transfer_nets_to_zero() {
        let harness = ProtocolHarness::standard().await;

        let plain = harness.send_plain(OWNER, OWNER, 2_000).await;
        assert!(plain.is_success(), "plain self-send failed: {plain:?}");
        assert_eq!(harness.balance(OWNER).await, SUPPLY);

        // Notified variant: the owner is no receiver contract, so this rolls
        // back, which also nets to zero.
        let notified = harness.send(OWNER, OWNER, 2_000).await;
        assert!(notified.is_success(), "notified self-send failed: {notified:?}");
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
        assert_eq!(harness.locked_balance(OWNER).await, 0);
        harness.assert_conserved();
    }

    // =============================================================================
    // MALFORMED INPUT
    // =============================================================================

    /// Account ids are validated at the wire boundary.
    #[tokio::test]
    async fn test_invalid_receiver_account_rejected() {
        let harness = ProtocolHarness::standard().await;

        let result = harness
            .execute(
                OWNER,
                LEDGER,
                ledger_methods::SEND,
                json!({ "new_owner_id": "X", "amount": "100" }),
            )
            .await;

        assert!(
            matches!(failure(&result), CallFailure::InvalidArgs { .. }),
            "one-letter account ids are invalid: {result:?}"
        );
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
    }

    /// Amounts travel as decimal strings; a bare JSON number is a shape error,
    /// not a silent coercion.
    #[tokio::test]
    async fn test_numeric_amount_rejected() {
        let harness = ProtocolHarness::standard().await;

        let result = harness
            .execute(
                OWNER,
                LEDGER,
                ledger_methods::SEND,
                json!({ "new_owner_id": "alice", "amount": 100 }),
            )
            .await;

        assert!(matches!(failure(&result), CallFailure::InvalidArgs { .. }));
        assert_eq!(harness.balance(OWNER).await, SUPPLY);
    }

    /// `process_bytes` accepts arbitrary hex payloads, including empty ones,
    /// and reports the running total.
    #[tokio::test]
    async fn test_process_bytes_accumulates() {
        let harness = ProtocolHarness::standard().await;

        let first = harness
            .execute(
                OWNER,
                LEDGER,
                ledger_methods::PROCESS_BYTES,
                json!({ "payload": "deadbeef" }),
            )
            .await;
        assert!(first.is_success());

        let second = harness
            .execute(OWNER, LEDGER, ledger_methods::PROCESS_BYTES, json!({}))
            .await;
        match second {
            PromiseResult::Succeeded(value) => {
                assert_eq!(value, json!(4), "4 + 0 bytes so far");
            }
            PromiseResult::Failed(failure) => panic!("process_bytes failed: {failure}"),
        }
    }
}
