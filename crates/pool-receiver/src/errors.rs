//! # Pool Errors
//!
//! Error types for the pool receiver.

use shared_types::RejectReason;
use thiserror::Error;

/// Pool receiver error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was already bound to a ledger.
    #[error("Already initialized")]
    AlreadyInitialized,

    /// A method ran before `new` bound the pool to a ledger.
    #[error("The pool is not initialized")]
    NotInitialized,

    /// A deposit was refused.
    #[error(transparent)]
    Rejected(#[from] RejectReason),
}
