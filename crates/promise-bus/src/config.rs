//! # Runtime Configuration

use crate::gas::{Gas, STANDARD_CALL_GAS};
use crate::runtime::RuntimeError;

/// Tunables of a [`crate::runtime::PromiseRuntime`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Event hub channel capacity.
    pub channel_capacity: usize,
    /// Gas charged when a change receipt is dispatched.
    pub base_call_cost: Gas,
    /// Gas attached to externally submitted calls that do not specify
    /// an amount.
    pub default_attached_gas: Gas,
    /// Upper bound on receipts executed in one drain. A settled protocol
    /// exchange takes a handful of receipts; hitting this bound means a
    /// contract is scheduling in a loop.
    pub max_receipts_per_run: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: crate::DEFAULT_CHANNEL_CAPACITY,
            base_call_cost: 5_000_000_000_000,
            default_attached_gas: STANDARD_CALL_GAS,
            max_receipts_per_run: 10_000,
        }
    }
}

impl RuntimeConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.channel_capacity == 0 {
            return Err(RuntimeError::InvalidConfig {
                detail: "channel_capacity must be nonzero".to_string(),
            });
        }
        if self.max_receipts_per_run == 0 {
            return Err(RuntimeError::InvalidConfig {
                detail: "max_receipts_per_run must be nonzero".to_string(),
            });
        }
        if self.default_attached_gas < self.base_call_cost {
            return Err(RuntimeError::InvalidConfig {
                detail: format!(
                    "default_attached_gas {} cannot cover base_call_cost {}",
                    self.default_attached_gas, self.base_call_cost
                ),
            });
        }
        Ok(())
    }
}
