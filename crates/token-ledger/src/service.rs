//! # Ledger Service
//!
//! Synchronous core of the token ledger: balances, the transfer state
//! machine, and the rollback journal behind one lock.
//!
//! The service never talks to the runtime. Scheduling notifications and
//! decoding wire arguments belong to [`crate::adapters::LedgerContract`];
//! everything here is plain state manipulation, so each contract method
//! runs to completion without suspension points.

use crate::domain::balance_store::BalanceStore;
use crate::domain::entities::{PendingTransfer, RollbackRecord};
use crate::domain::errors::{LedgerError, StateMachineViolation};
use crate::domain::invariants::{invariant_conservation, invariant_locked_covers_pending};
use crate::domain::rollback::{RollbackLedger, DEFAULT_JOURNAL_CAP};
use crate::domain::value_objects::TransferState;

use parking_lot::RwLock;
use promise_bus::gas::{Gas, STANDARD_CALL_GAS};
use shared_types::{AccountId, Balance, TransferId};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Ledger service configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Gas attached to the receiver notification.
    pub notify_gas: Gas,
    /// Gas reserved for the settlement callback.
    pub callback_gas: Gas,
    /// Rollback journal entries retained.
    pub rollback_journal_cap: usize,
    /// Settled transfers retained for state queries.
    pub max_settled_remembered: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            notify_gas: STANDARD_CALL_GAS / 3,
            callback_gas: STANDARD_CALL_GAS / 10,
            rollback_journal_cap: DEFAULT_JOURNAL_CAP,
            max_settled_remembered: 1024,
        }
    }
}

/// Statistics for the ledger service.
#[derive(Debug, Default, Clone)]
pub struct LedgerStats {
    /// Transfers accepted by `send`.
    pub sends_accepted: u64,
    /// Sends rejected synchronously.
    pub sends_rejected: u64,
    /// Transfers settled as committed.
    pub transfers_committed: u64,
    /// Transfers settled as rolled back.
    pub transfers_rolled_back: u64,
}

/// What `send` did with the funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Settled immediately; no receiver verdict pending.
    Direct {
        /// The settled transfer.
        transfer_id: TransferId,
    },
    /// Funds locked; the receiver must be notified.
    NeedsNotify {
        /// The pending transfer.
        transfer_id: TransferId,
    },
}

impl SendOutcome {
    /// The transfer this outcome refers to.
    #[must_use]
    pub fn transfer_id(&self) -> TransferId {
        match self {
            Self::Direct { transfer_id } | Self::NeedsNotify { transfer_id } => *transfer_id,
        }
    }
}

/// Mutable ledger state, present only after initialization.
struct LedgerBook {
    store: BalanceStore,
    transfers: HashMap<TransferId, PendingTransfer>,
    settled_order: VecDeque<TransferId>,
    rollbacks: RollbackLedger,
    bytes_processed: u64,
}

/// The main ledger service.
///
/// This service:
/// 1. Locks funds synchronously and reports shortfalls to the caller
/// 2. Settles each transfer exactly once, as committed or rolled back
/// 3. Keeps the rollback count and journal
/// 4. Maintains transfer statistics
pub struct LedgerService {
    /// Account the ledger contract lives on.
    account: AccountId,
    /// Service configuration.
    config: LedgerConfig,
    /// Ledger state; `None` until `initialize`.
    state: RwLock<Option<LedgerBook>>,
    /// Service statistics.
    stats: RwLock<LedgerStats>,
}

impl LedgerService {
    /// Create an uninitialized ledger service.
    #[must_use]
    pub fn new(account: AccountId, config: LedgerConfig) -> Self {
        Self {
            account,
            config,
            state: RwLock::new(None),
            stats: RwLock::new(LedgerStats::default()),
        }
    }

    /// Account the ledger contract lives on.
    #[must_use]
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get current service statistics.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        self.stats.read().clone()
    }

    /// Set up the ledger with its full supply on the owner account.
    ///
    /// Callable exactly once for the lifetime of the contract.
    #[instrument(skip(self), fields(ledger = %self.account, owner = %owner, total_supply = %total_supply))]
    pub fn initialize(&self, owner: AccountId, total_supply: Balance) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        if state.is_some() {
            warn!("Rejecting repeated initialization");
            return Err(LedgerError::AlreadyInitialized);
        }
        *state = Some(LedgerBook {
            store: BalanceStore::new(owner, total_supply),
            transfers: HashMap::new(),
            settled_order: VecDeque::new(),
            rollbacks: RollbackLedger::new(self.config.rollback_journal_cap),
            bytes_processed: 0,
        });
        info!("Ledger initialized");
        Ok(())
    }

    /// Lock `amount` on the sender and open a transfer to the receiver.
    ///
    /// With `notify` the transfer stays pending until
    /// [`LedgerService::resolve_notify`] delivers the receiver's verdict;
    /// without it the transfer commits before this method returns. A
    /// shortfall is reported synchronously and changes nothing.
    #[instrument(
        skip(self, message),
        fields(ledger = %self.account, sender = %sender, receiver = %receiver, amount = %amount, notify)
    )]
    pub fn send(
        &self,
        sender: AccountId,
        receiver: AccountId,
        amount: Balance,
        message: Vec<u8>,
        notify: bool,
    ) -> Result<SendOutcome, LedgerError> {
        let mut state = self.state.write();
        let book = state.as_mut().ok_or(LedgerError::NotInitialized)?;

        if let Err(err) = book.store.lock(&sender, amount) {
            debug!(error = %err, "Send rejected");
            self.stats.write().sends_rejected += 1;
            return Err(err);
        }

        let transfer_id = Uuid::new_v4();
        let mut transfer =
            PendingTransfer::new(transfer_id, sender, receiver, amount, message);

        let outcome = if notify {
            book.transfers.insert(transfer_id, transfer);
            debug!(%transfer_id, "Funds locked, awaiting receiver verdict");
            SendOutcome::NeedsNotify { transfer_id }
        } else {
            transfer.transition_to(TransferState::Committed)?;
            book.store
                .commit(&transfer.sender, &transfer.receiver, amount)?;
            book.transfers.insert(transfer_id, transfer);
            Self::remember_settled(book, transfer_id, self.config.max_settled_remembered);
            self.stats.write().transfers_committed += 1;
            debug_assert!(invariant_conservation(&book.store).is_ok());
            debug!(%transfer_id, "Transfer committed directly");
            SendOutcome::Direct { transfer_id }
        };

        self.stats.write().sends_accepted += 1;
        Ok(outcome)
    }

    /// Record that the receiver notification left the ledger.
    pub fn mark_dispatched(&self, transfer_id: TransferId) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let book = state.as_mut().ok_or(LedgerError::NotInitialized)?;
        let transfer = book
            .transfers
            .get_mut(&transfer_id)
            .ok_or(StateMachineViolation::UnknownTransfer { id: transfer_id })?;
        transfer.transition_to(TransferState::NotifyDispatched)?;
        Ok(())
    }

    /// Settle a pending transfer with the receiver's verdict.
    ///
    /// Acceptance commits the locked funds to the receiver; anything else
    /// restores them to the sender and bumps the rollback count. Each
    /// transfer settles at most once: a second verdict is a state machine
    /// violation.
    #[instrument(skip(self, reason), fields(ledger = %self.account, %transfer_id, accepted))]
    pub fn resolve_notify(
        &self,
        transfer_id: TransferId,
        accepted: bool,
        reason: Option<String>,
    ) -> Result<PendingTransfer, LedgerError> {
        let mut state = self.state.write();
        let book = state.as_mut().ok_or(LedgerError::NotInitialized)?;
        let transfer = book
            .transfers
            .get_mut(&transfer_id)
            .ok_or(StateMachineViolation::UnknownTransfer { id: transfer_id })?;

        if accepted {
            transfer.transition_to(TransferState::Committed)?;
            let settled = transfer.clone();
            book.store
                .commit(&settled.sender, &settled.receiver, settled.amount)?;
            self.stats.write().transfers_committed += 1;
            info!(sender = %settled.sender, receiver = %settled.receiver, amount = %settled.amount, "Transfer committed");
            Self::remember_settled(book, transfer_id, self.config.max_settled_remembered);
            debug_assert!(invariant_conservation(&book.store).is_ok());
            Ok(settled)
        } else {
            transfer.transition_to(TransferState::RolledBack)?;
            let settled = transfer.clone();
            book.store.rollback(&settled.sender, settled.amount)?;
            let reason = reason.unwrap_or_else(|| "receiver rejected the transfer".to_string());
            book.rollbacks.record(RollbackRecord {
                transfer_id,
                sender: settled.sender.clone(),
                receiver: settled.receiver.clone(),
                amount: settled.amount,
                reason: reason.clone(),
            });
            self.stats.write().transfers_rolled_back += 1;
            warn!(sender = %settled.sender, amount = %settled.amount, reason = %reason, "Transfer rolled back");
            Self::remember_settled(book, transfer_id, self.config.max_settled_remembered);
            debug_assert!(invariant_conservation(&book.store).is_ok());
            Ok(settled)
        }
    }

    /// The supply fixed at initialization.
    pub fn total_supply(&self) -> Result<Balance, LedgerError> {
        self.with_book(|book| book.store.total_supply())
    }

    /// Spendable balance of an account.
    pub fn balance_of(&self, account: &AccountId) -> Result<Balance, LedgerError> {
        self.with_book(|book| book.store.balance_of(account))
    }

    /// Balance an account holds in unsettled transfers.
    pub fn locked_balance_of(&self, account: &AccountId) -> Result<Balance, LedgerError> {
        self.with_book(|book| book.store.locked_balance_of(account))
    }

    /// Transfers reversed since initialization.
    pub fn rollback_count(&self) -> Result<u64, LedgerError> {
        self.with_book(|book| book.rollbacks.count())
    }

    /// State of a transfer, if the ledger still remembers it.
    pub fn transfer_state(&self, transfer_id: TransferId) -> Result<Option<TransferState>, LedgerError> {
        self.with_book(|book| book.transfers.get(&transfer_id).map(|t| t.state))
    }

    /// Count a payload toward the running byte total and return it.
    pub fn process_bytes(&self, payload: &[u8]) -> Result<u64, LedgerError> {
        let mut state = self.state.write();
        let book = state.as_mut().ok_or(LedgerError::NotInitialized)?;
        book.bytes_processed = book.bytes_processed.saturating_add(payload.len() as u64);
        Ok(book.bytes_processed)
    }

    /// Verify conservation and lock coverage over the current state.
    ///
    /// Meaningful only at quiescent points, with no receipt mid-flight.
    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        let state = self.state.read();
        let book = state.as_ref().ok_or(LedgerError::NotInitialized)?;
        invariant_conservation(&book.store)?;
        invariant_locked_covers_pending(&book.store, book.transfers.values())?;
        Ok(())
    }

    fn with_book<T>(&self, read: impl FnOnce(&LedgerBook) -> T) -> Result<T, LedgerError> {
        let state = self.state.read();
        let book = state.as_ref().ok_or(LedgerError::NotInitialized)?;
        Ok(read(book))
    }

    /// Queue a settled transfer for eviction once the retention cap fills.
    fn remember_settled(book: &mut LedgerBook, transfer_id: TransferId, cap: usize) {
        book.settled_order.push_back(transfer_id);
        while book.settled_order.len() > cap {
            if let Some(evicted) = book.settled_order.pop_front() {
                book.transfers.remove(&evicted);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
