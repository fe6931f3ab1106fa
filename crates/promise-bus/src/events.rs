//! # Protocol Events
//!
//! Everything observable about the runtime and the transfer protocol
//! flows through here: receipt dispatch and resolution at the runtime
//! layer, and the transfer lifecycle as reported by the contracts.
//!
//! A zero-amount transfer emits the same lifecycle events as any other,
//! which is what distinguishes it from a call that did nothing.

use serde::{Deserialize, Serialize};
use shared_types::{codec, AccountId, Balance, TransferId};
use uuid::Uuid;

/// All events published to the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProtocolEvent {
    // =========================================================================
    // RUNTIME LAYER
    // =========================================================================
    /// A contract was registered at an account.
    ContractRegistered {
        /// The account the contract now occupies.
        account: AccountId,
    },

    /// A change receipt started executing.
    CallDispatched {
        /// Correlation id of the receipt.
        call_id: Uuid,
        /// Runtime-authenticated caller.
        caller: AccountId,
        /// Target account.
        target: AccountId,
        /// Invoked method.
        method: String,
    },

    /// A change receipt settled.
    CallResolved {
        /// Correlation id of the receipt.
        call_id: Uuid,
        /// Target account.
        target: AccountId,
        /// Invoked method.
        method: String,
        /// Whether the call succeeded.
        success: bool,
        /// Failure rendering when `success` is false.
        error: Option<String>,
    },

    /// A callback receipt was enqueued for a settled call.
    CallbackScheduled {
        /// The call whose outcome is being reported.
        parent_call_id: Uuid,
        /// Correlation id of the callback receipt.
        callback_call_id: Uuid,
        /// The contract receiving its own callback.
        scheduler: AccountId,
        /// Callback method.
        method: String,
    },

    // =========================================================================
    // TRANSFER LIFECYCLE (published by ledger contracts)
    // =========================================================================
    /// Funds moved from available to locked for a new transfer.
    TransferLocked {
        /// The transfer.
        transfer_id: TransferId,
        /// The ledger contract reporting.
        ledger: AccountId,
        /// Sending account.
        sender: AccountId,
        /// Receiving account.
        receiver: AccountId,
        /// Locked amount.
        #[serde(with = "codec::balance_str")]
        amount: Balance,
    },

    /// The receiver notification was handed to the runtime.
    TransferNotifyDispatched {
        /// The transfer.
        transfer_id: TransferId,
        /// The ledger contract reporting.
        ledger: AccountId,
        /// Notified account.
        receiver: AccountId,
    },

    /// Locked funds were delivered to the receiver.
    TransferCommitted {
        /// The transfer.
        transfer_id: TransferId,
        /// The ledger contract reporting.
        ledger: AccountId,
        /// Sending account.
        sender: AccountId,
        /// Receiving account.
        receiver: AccountId,
        /// Delivered amount.
        #[serde(with = "codec::balance_str")]
        amount: Balance,
    },

    /// Locked funds were restored to the sender.
    TransferRolledBack {
        /// The transfer.
        transfer_id: TransferId,
        /// The ledger contract reporting.
        ledger: AccountId,
        /// The account whose funds were restored.
        sender: AccountId,
        /// Restored amount.
        #[serde(with = "codec::balance_str")]
        amount: Balance,
        /// Why the notify failed.
        reason: String,
    },

    // =========================================================================
    // RECEIVER SIDE (published by receiver contracts)
    // =========================================================================
    /// A receiver accepted a deposit.
    DepositAccepted {
        /// The receiver contract reporting.
        pool: AccountId,
        /// The ledger that notified.
        ledger: AccountId,
        /// Original sender of the funds.
        sender: AccountId,
        /// Accepted amount.
        #[serde(with = "codec::balance_str")]
        amount: Balance,
    },
}

impl ProtocolEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ContractRegistered { .. }
            | Self::CallDispatched { .. }
            | Self::CallResolved { .. }
            | Self::CallbackScheduled { .. } => EventTopic::Runtime,
            Self::TransferLocked { .. }
            | Self::TransferNotifyDispatched { .. }
            | Self::TransferCommitted { .. }
            | Self::TransferRolledBack { .. } => EventTopic::Transfers,
            Self::DepositAccepted { .. } => EventTopic::Deposits,
        }
    }

    /// The contract account this event is about.
    #[must_use]
    pub fn account(&self) -> &AccountId {
        match self {
            Self::ContractRegistered { account } => account,
            Self::CallDispatched { target, .. } | Self::CallResolved { target, .. } => target,
            Self::CallbackScheduled { scheduler, .. } => scheduler,
            Self::TransferLocked { ledger, .. }
            | Self::TransferNotifyDispatched { ledger, .. }
            | Self::TransferCommitted { ledger, .. }
            | Self::TransferRolledBack { ledger, .. } => ledger,
            Self::DepositAccepted { pool, .. } => pool,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Receipt dispatch, resolution, and registration.
    Runtime,
    /// Transfer lifecycle reported by ledgers.
    Transfers,
    /// Deposits reported by receivers.
    Deposits,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Contract accounts to include. Empty means all accounts.
    pub accounts: Vec<AccountId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            accounts: Vec::new(),
        }
    }

    /// Create a filter for events about specific contract accounts.
    #[must_use]
    pub fn accounts(accounts: Vec<AccountId>) -> Self {
        Self {
            topics: Vec::new(),
            accounts,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ProtocolEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let account_match =
            self.accounts.is_empty() || self.accounts.contains(event.account());

        topic_match && account_match
    }
}
