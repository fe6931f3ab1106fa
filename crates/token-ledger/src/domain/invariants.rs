//! # Domain Invariants
//!
//! Business rules for the token ledger.

use super::balance_store::BalanceStore;
use super::entities::PendingTransfer;
use super::errors::StateMachineViolation;
use shared_types::{AccountId, Balance};
use std::collections::HashMap;

/// Invariant: Conservation.
///
/// The sum of every available and locked balance equals the total supply.
/// Holds at every quiescent point; only checkable between receipts.
pub fn invariant_conservation(store: &BalanceStore) -> Result<(), StateMachineViolation> {
    let mut actual: Balance = 0;
    for (_, funds) in store.iter() {
        actual = actual
            .checked_add(funds.available)
            .and_then(|sum| sum.checked_add(funds.locked))
            .ok_or(StateMachineViolation::ConservationBreach {
                expected: store.total_supply(),
                actual: Balance::MAX,
            })?;
    }
    if actual != store.total_supply() {
        return Err(StateMachineViolation::ConservationBreach {
            expected: store.total_supply(),
            actual,
        });
    }
    Ok(())
}

/// Invariant: Locked balances cover pending transfers.
///
/// Each account's locked balance equals the sum of its unsettled
/// transfers. Settled transfers hold no lock.
pub fn invariant_locked_covers_pending<'a, I>(
    store: &BalanceStore,
    pending: I,
) -> Result<(), StateMachineViolation>
where
    I: IntoIterator<Item = &'a PendingTransfer>,
{
    let mut expected: HashMap<&AccountId, Balance> = HashMap::new();
    for transfer in pending {
        if transfer.state.holds_lock() {
            let slot = expected.entry(&transfer.sender).or_insert(0);
            *slot = slot.saturating_add(transfer.amount);
        }
    }
    for (account, funds) in store.iter() {
        let covered = expected.get(account).copied().unwrap_or(0);
        if funds.locked != covered {
            return Err(StateMachineViolation::LockedUnderflow {
                account: account.clone(),
                needed: covered,
                locked: funds.locked,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
