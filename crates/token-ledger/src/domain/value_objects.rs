//! # Domain Value Objects
//!
//! Immutable value types for the token ledger.

use serde::{Deserialize, Serialize};

/// Transfer state machine.
///
/// A transfer that notifies its receiver passes through
/// `Locked -> NotifyDispatched -> {Committed, RolledBack}`. A plain
/// transfer commits straight from `Locked`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferState {
    /// Funds moved from available to locked on the sender.
    #[default]
    Locked,
    /// Receiver notification scheduled, verdict pending.
    NotifyDispatched,
    /// Funds credited to the receiver, locked amount released.
    Committed,
    /// Funds restored to the sender's available balance.
    RolledBack,
}

impl TransferState {
    /// Check if transition is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: TransferState) -> bool {
        match (self, next) {
            (Self::Locked, Self::NotifyDispatched) => true,
            // Plain transfer: no receiver verdict to wait for.
            (Self::Locked, Self::Committed) => true,
            (Self::NotifyDispatched, Self::Committed) => true,
            (Self::NotifyDispatched, Self::RolledBack) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }

    /// Check if the transfer still holds locked funds.
    #[must_use]
    pub fn holds_lock(&self) -> bool {
        !self.is_terminal()
    }
}

// =============================================================================
// Tests
// =============================================================================
