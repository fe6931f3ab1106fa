//! # Gas Budgets
//!
//! Deterministic gas accounting for receipts. There is no instruction
//! metering: gas is charged per dispatch and per scheduled call, which is
//! enough to make starvation and runaway chains observable without
//! simulating a fee market.
//!
//! A callback's gas is carved out of the scheduling receipt at schedule
//! time, so a callee can never consume the budget its caller reserved for
//! resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gas unit.
pub type Gas = u64;

/// Gas attached to an externally submitted call when the caller does not
/// specify an amount.
pub const STANDARD_CALL_GAS: Gas = 200_000_000_000_000;

/// A charge that did not fit in the remaining budget.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("gas exhausted: needed {needed}, remaining {remaining}")]
pub struct GasExhausted {
    /// The cost that was requested.
    pub needed: Gas,
    /// What was left in the budget.
    pub remaining: Gas,
}

/// Remaining gas of a single receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasBudget {
    remaining: Gas,
}

impl GasBudget {
    /// Create a budget holding `attached` gas.
    #[must_use]
    pub fn new(attached: Gas) -> Self {
        Self { remaining: attached }
    }

    /// Create a budget holding [`STANDARD_CALL_GAS`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_CALL_GAS)
    }

    /// Gas left in this budget.
    #[must_use]
    pub fn remaining(&self) -> Gas {
        self.remaining
    }

    /// Whether `cost` fits in the remaining budget.
    #[must_use]
    pub fn can_cover(&self, cost: Gas) -> bool {
        cost <= self.remaining
    }

    /// Deduct `cost`, failing without deduction if it does not fit.
    pub fn try_charge(&mut self, cost: Gas) -> Result<(), GasExhausted> {
        match self.remaining.checked_sub(cost) {
            Some(rest) => {
                self.remaining = rest;
                Ok(())
            }
            None => Err(GasExhausted {
                needed: cost,
                remaining: self.remaining,
            }),
        }
    }
}
