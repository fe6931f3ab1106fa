//! # Call Envelope
//!
//! The context a contract receives for each invocation, and the ways a
//! call can fail.
//!
//! ## Envelope-Only Identity
//!
//! `CallContext::caller` is the identity the runtime vouches for: the
//! signing account for externally submitted calls, the scheduling
//! contract for cross-contract calls and callbacks. Contracts MUST base
//! every authorization decision on it; identity-shaped fields inside
//! argument payloads are informational only.

use crate::gas::{Gas, GasBudget};
use serde_json::Value;
use shared_types::AccountId;
use thiserror::Error;
use uuid::Uuid;

/// Per-invocation context handed to a contract by the runtime.
#[derive(Clone, Debug)]
pub struct CallContext {
    /// Correlation id of this invocation.
    pub call_id: Uuid,
    /// Runtime-authenticated caller. Sole authorization input.
    pub caller: AccountId,
    /// The account the executing contract is deployed at.
    pub contract: AccountId,
    /// Gas remaining after the dispatch charge. Contracts validate
    /// against this before locking state that a scheduled call must
    /// later resolve.
    pub budget: GasBudget,
    /// Outcome of the awaited call when this invocation is a callback,
    /// `None` otherwise.
    pub promise_result: Option<PromiseResult>,
}

impl CallContext {
    /// Whether this invocation resolves an earlier scheduled call.
    #[must_use]
    pub fn is_callback(&self) -> bool {
        self.promise_result.is_some()
    }

    /// Whether the caller is the executing contract itself.
    #[must_use]
    pub fn is_self_call(&self) -> bool {
        self.caller == self.contract
    }
}

/// Settled outcome of a dispatched call.
#[derive(Clone, Debug, PartialEq)]
pub enum PromiseResult {
    /// The call completed; carries its return value.
    Succeeded(Value),
    /// The call failed for any reason: trap, missing target, missing
    /// method, or exhausted gas. Callers cannot distinguish these beyond
    /// the carried failure, and the protocol treats them uniformly.
    Failed(CallFailure),
}

impl PromiseResult {
    /// Whether the call completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&CallFailure> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Convert into a plain `Result`.
    pub fn into_result(self) -> Result<Value, CallFailure> {
        match self {
            Self::Succeeded(value) => Ok(value),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Ways a dispatched call can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// No contract is registered at the target account.
    #[error("no contract at account {account}")]
    AccountNotFound {
        /// The missing target.
        account: AccountId,
    },

    /// The target contract does not expose the method.
    #[error("contract {account} has no method {method}")]
    MethodNotFound {
        /// The target contract.
        account: AccountId,
        /// The unknown method name.
        method: String,
    },

    /// The receipt's budget could not cover a charge.
    #[error("{account}::{method} out of gas: needed {needed}, remaining {remaining}")]
    OutOfGas {
        /// The contract being charged.
        account: AccountId,
        /// The method being dispatched or scheduling.
        method: String,
        /// The cost that did not fit.
        needed: Gas,
        /// Gas that was left.
        remaining: Gas,
    },

    /// Arguments did not deserialize into the method's expected shape.
    #[error("invalid arguments for {method}: {detail}")]
    InvalidArgs {
        /// The method whose arguments were malformed.
        method: String,
        /// Deserialization failure detail.
        detail: String,
    },

    /// The contract itself rejected or trapped during execution.
    #[error("{account}::{method} failed: {message}")]
    Execution {
        /// The executing contract.
        account: AccountId,
        /// The executing method.
        method: String,
        /// The contract's failure message.
        message: String,
    },
}

impl CallFailure {
    /// Build a [`CallFailure::Execution`] from any displayable error.
    pub fn execution(
        account: &AccountId,
        method: &str,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::Execution {
            account: account.clone(),
            method: method.to_string(),
            message: error.to_string(),
        }
    }

    /// Build a [`CallFailure::InvalidArgs`] from a serde error.
    pub fn invalid_args(method: &str, error: impl std::fmt::Display) -> Self {
        Self::InvalidArgs {
            method: method.to_string(),
            detail: error.to_string(),
        }
    }
}
