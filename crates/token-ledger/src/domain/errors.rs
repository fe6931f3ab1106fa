//! # Domain Errors
//!
//! Error types for the token ledger.

use shared_types::{AccountId, Balance, TransferId};
use thiserror::Error;

/// Ledger error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger state was already set up.
    #[error("Already initialized")]
    AlreadyInitialized,

    /// A method ran before `new` set up the ledger state.
    #[error("The ledger is not initialized")]
    NotInitialized,

    /// Sender's available balance cannot cover the transfer.
    #[error("Not enough balance: {account} has {available} available, needs {needed}")]
    InsufficientBalance {
        /// Account short on funds.
        account: AccountId,
        /// Amount the operation required.
        needed: Balance,
        /// Available (unlocked) balance at the time of the call.
        available: Balance,
    },

    /// A settlement callback arrived from an account other than the
    /// ledger itself.
    #[error("handle_notify_result is only callable by the ledger account, got {caller}")]
    UnauthorizedCallback {
        /// The offending caller.
        caller: AccountId,
    },

    /// Bookkeeping reached a state the transfer machine forbids.
    #[error(transparent)]
    StateMachine(#[from] StateMachineViolation),
}

/// Violations of the transfer state machine and its bookkeeping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateMachineViolation {
    /// Transition not permitted from the current state.
    #[error("invalid transfer transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the transfer was in.
        from: String,
        /// State the transition asked for.
        to: String,
    },

    /// No pending transfer under that id.
    #[error("unknown transfer: {id}")]
    UnknownTransfer {
        /// The missing transfer id.
        id: TransferId,
    },

    /// A settlement asked for more locked funds than the account holds.
    #[error("locked balance underflow: {account} holds {locked} locked, needs {needed}")]
    LockedUnderflow {
        /// Account being settled.
        account: AccountId,
        /// Locked amount the settlement required.
        needed: Balance,
        /// Locked balance actually held.
        locked: Balance,
    },

    /// A credit would overflow the receiver's balance.
    #[error("balance overflow crediting {account}")]
    BalanceOverflow {
        /// Account being credited.
        account: AccountId,
    },

    /// Funds were created or destroyed.
    #[error("conservation breach: supply is {expected}, accounts sum to {actual}")]
    ConservationBreach {
        /// The fixed total supply.
        expected: Balance,
        /// Sum of available and locked balances.
        actual: Balance,
    },
}

// =============================================================================
// Tests
// =============================================================================
