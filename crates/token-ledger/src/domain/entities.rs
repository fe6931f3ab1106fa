//! # Domain Entities
//!
//! Core entities for the token ledger.

use super::errors::StateMachineViolation;
use super::value_objects::TransferState;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Balance, TransferId};

/// An in-flight transfer holding a lock on the sender's funds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// Unique identifier.
    pub id: TransferId,
    /// Account whose funds are locked.
    pub sender: AccountId,
    /// Account to credit on commit.
    pub receiver: AccountId,
    /// Amount locked.
    #[serde(with = "shared_types::codec::balance_str")]
    pub amount: Balance,
    /// Opaque payload forwarded to the receiver.
    #[serde(with = "shared_types::codec::hex_bytes", default)]
    pub message: Vec<u8>,
    /// Current state.
    pub state: TransferState,
}

impl PendingTransfer {
    /// Create a transfer in the `Locked` state.
    #[must_use]
    pub fn new(
        id: TransferId,
        sender: AccountId,
        receiver: AccountId,
        amount: Balance,
        message: Vec<u8>,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            amount,
            message,
            state: TransferState::Locked,
        }
    }

    /// Transition to new state.
    pub fn transition_to(&mut self, new_state: TransferState) -> Result<(), StateMachineViolation> {
        if !self.state.can_transition_to(new_state) {
            return Err(StateMachineViolation::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", new_state),
            });
        }
        self.state = new_state;
        Ok(())
    }

    /// Check if the transfer has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Journal entry for a reversed transfer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RollbackRecord {
    /// The reversed transfer.
    pub transfer_id: TransferId,
    /// Account whose funds were restored.
    pub sender: AccountId,
    /// Receiver that never got the funds.
    pub receiver: AccountId,
    /// Amount restored.
    #[serde(with = "shared_types::codec::balance_str")]
    pub amount: Balance,
    /// Why the transfer was reversed.
    pub reason: String,
}

// =============================================================================
// Tests
// =============================================================================
