//! # Balance Store
//!
//! Per-account bookkeeping split into available and locked funds.
//!
//! Locking moves funds out of the spendable balance without destroying
//! them; commit and rollback are the only exits from a lock. The store
//! never creates or destroys tokens after construction.

use super::errors::{LedgerError, StateMachineViolation};
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Balance};
use std::collections::HashMap;

/// Funds held by a single account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFunds {
    /// Spendable balance.
    #[serde(with = "shared_types::codec::balance_str")]
    pub available: Balance,
    /// Balance held by in-flight transfers.
    #[serde(with = "shared_types::codec::balance_str")]
    pub locked: Balance,
}

impl AccountFunds {
    /// Available plus locked.
    #[must_use]
    pub fn total(&self) -> Balance {
        // available + locked never exceeds the total supply.
        self.available.saturating_add(self.locked)
    }
}

/// All account balances for one token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceStore {
    accounts: HashMap<AccountId, AccountFunds>,
    #[serde(with = "shared_types::codec::balance_str")]
    total_supply: Balance,
}

impl BalanceStore {
    /// Create a store with the entire supply on the owner's account.
    #[must_use]
    pub fn new(owner: AccountId, total_supply: Balance) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            owner,
            AccountFunds {
                available: total_supply,
                locked: 0,
            },
        );
        Self {
            accounts,
            total_supply,
        }
    }

    /// The supply fixed at construction.
    #[must_use]
    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// Spendable balance of an account. Unknown accounts hold zero.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Balance {
        self.accounts.get(account).map_or(0, |f| f.available)
    }

    /// Locked balance of an account. Unknown accounts hold zero.
    #[must_use]
    pub fn locked_balance_of(&self, account: &AccountId) -> Balance {
        self.accounts.get(account).map_or(0, |f| f.locked)
    }

    /// Iterate over every account with funds recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &AccountFunds)> {
        self.accounts.iter()
    }

    /// Move funds from the sender's available balance into its lock.
    ///
    /// Fails without touching the store when the available balance cannot
    /// cover the amount. Locking zero succeeds on any account.
    pub fn lock(&mut self, sender: &AccountId, amount: Balance) -> Result<(), LedgerError> {
        let funds = self.accounts.entry(sender.clone()).or_default();
        match funds.available.checked_sub(amount) {
            Some(rest) => {
                funds.available = rest;
                // locked + available never exceeds total supply.
                funds.locked = funds.locked.saturating_add(amount);
                Ok(())
            }
            None => Err(LedgerError::InsufficientBalance {
                account: sender.clone(),
                needed: amount,
                available: funds.available,
            }),
        }
    }

    /// Release a lock on the sender and credit the receiver.
    ///
    /// The credit is validated before the lock is touched, so a failure
    /// leaves the store exactly as it was. Sender and receiver may be the
    /// same account.
    pub fn commit(
        &mut self,
        sender: &AccountId,
        receiver: &AccountId,
        amount: Balance,
    ) -> Result<(), StateMachineViolation> {
        let credited = self
            .accounts
            .get(receiver)
            .copied()
            .unwrap_or_default()
            .available
            .checked_add(amount)
            .ok_or_else(|| StateMachineViolation::BalanceOverflow {
                account: receiver.clone(),
            })?;
        self.debit_locked(sender, amount)?;
        self.accounts.entry(receiver.clone()).or_default().available = credited;
        Ok(())
    }

    /// Release a lock on the sender back into its available balance.
    pub fn rollback(
        &mut self,
        sender: &AccountId,
        amount: Balance,
    ) -> Result<(), StateMachineViolation> {
        self.debit_locked(sender, amount)?;
        let funds = self.accounts.entry(sender.clone()).or_default();
        funds.available = funds.available.saturating_add(amount);
        Ok(())
    }

    fn debit_locked(
        &mut self,
        account: &AccountId,
        amount: Balance,
    ) -> Result<(), StateMachineViolation> {
        let funds = self.accounts.entry(account.clone()).or_default();
        match funds.locked.checked_sub(amount) {
            Some(rest) => {
                funds.locked = rest;
                Ok(())
            }
            None => Err(StateMachineViolation::LockedUnderflow {
                account: account.clone(),
                needed: amount,
                locked: funds.locked,
            }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
