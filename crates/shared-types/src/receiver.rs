//! # Receiver Capability
//!
//! The explicit interface a contract implements to accept token deposits.
//!
//! Support is an explicit trait plus the wire entry points in
//! [`crate::methods::receiver`]; there is no name-probing or reflection.
//! A ledger discovers whether a counterparty is a receiver from the
//! outcome of the actual notification: a contract that lacks the entry
//! point fails the call, which the ledger cannot and does not distinguish
//! from an explicit rejection.

use crate::account::AccountId;
use crate::Balance;
use thiserror::Error;

/// Why a receiver refused a deposit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The notifying ledger is not the one this receiver trusts.
    #[error("deposits accepted only from {expected}, not {got}")]
    UntrustedLedger {
        /// The ledger this receiver was configured for.
        expected: AccountId,
        /// The runtime-authenticated caller that actually notified.
        got: AccountId,
    },

    /// The receiver is not ready to take deposits.
    #[error("receiver not initialized")]
    NotInitialized,
}

/// A contract able to accept token deposits.
///
/// `accept` must be atomic: either the deposit is recorded and `Ok` is
/// returned, or state is untouched and the reason is returned. The
/// notifying ledger rolls the transfer back on any error.
pub trait TokenReceiver {
    /// Whether this contract advertises receiver support. Operational
    /// tooling reads this; ledgers never pre-check it.
    fn declares_support(&self) -> bool;

    /// Take delivery of `amount` tokens sent by `sender` through the
    /// calling ledger contract.
    ///
    /// `calling_ledger` is the runtime-authenticated account that invoked
    /// the notification, and is the only identity that may be used for
    /// authorization.
    fn accept(
        &self,
        calling_ledger: &AccountId,
        sender: &AccountId,
        amount: Balance,
        message: &[u8],
    ) -> Result<(), RejectReason>;
}
