//! # Pool Service
//!
//! Deposit bookkeeping for the pool receiver: one trusted ledger, one
//! running total.

use crate::errors::PoolError;

use parking_lot::RwLock;
use shared_types::{AccountId, Balance, RejectReason, TokenReceiver};
use tracing::{debug, info, instrument, warn};

/// Statistics for the pool service.
#[derive(Debug, Default, Clone)]
pub struct PoolStats {
    /// Deposits recorded.
    pub deposits_accepted: u64,
    /// Notifications refused.
    pub deposits_rejected: u64,
}

/// Mutable pool state, present only after initialization.
struct PoolBook {
    token_id: AccountId,
    total_received: Balance,
    deposits: u64,
}

/// The pool's deposit ledger.
///
/// `accept` is atomic: a refused deposit changes nothing, so the notifying
/// ledger can roll the transfer back knowing the pool recorded nothing.
pub struct PoolService {
    /// Account the pool contract lives on.
    account: AccountId,
    /// Pool state; `None` until `initialize`.
    state: RwLock<Option<PoolBook>>,
    /// Service statistics.
    stats: RwLock<PoolStats>,
}

impl PoolService {
    /// Create an uninitialized pool service.
    #[must_use]
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            state: RwLock::new(None),
            stats: RwLock::new(PoolStats::default()),
        }
    }

    /// Account the pool contract lives on.
    #[must_use]
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Get current service statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.read().clone()
    }

    /// Bind the pool to the only ledger it will accept deposits from.
    ///
    /// Callable exactly once for the lifetime of the contract.
    #[instrument(skip(self), fields(pool = %self.account, token_id = %token_id))]
    pub fn initialize(&self, token_id: AccountId) -> Result<(), PoolError> {
        let mut state = self.state.write();
        if state.is_some() {
            warn!("Rejecting repeated initialization");
            return Err(PoolError::AlreadyInitialized);
        }
        *state = Some(PoolBook {
            token_id,
            total_received: 0,
            deposits: 0,
        });
        info!("Pool initialized");
        Ok(())
    }

    /// The ledger this pool trusts.
    pub fn token_id(&self) -> Result<AccountId, PoolError> {
        let state = self.state.read();
        let book = state.as_ref().ok_or(PoolError::NotInitialized)?;
        Ok(book.token_id.clone())
    }

    /// Sum of all accepted deposits.
    pub fn total_received(&self) -> Result<Balance, PoolError> {
        let state = self.state.read();
        let book = state.as_ref().ok_or(PoolError::NotInitialized)?;
        Ok(book.total_received)
    }

    /// Deposits accepted so far.
    pub fn deposit_count(&self) -> Result<u64, PoolError> {
        let state = self.state.read();
        let book = state.as_ref().ok_or(PoolError::NotInitialized)?;
        Ok(book.deposits)
    }
}

impl TokenReceiver for PoolService {
    fn declares_support(&self) -> bool {
        true
    }

    fn accept(
        &self,
        calling_ledger: &AccountId,
        sender: &AccountId,
        amount: Balance,
        message: &[u8],
    ) -> Result<(), RejectReason> {
        let mut state = self.state.write();
        let Some(book) = state.as_mut() else {
            self.stats.write().deposits_rejected += 1;
            return Err(RejectReason::NotInitialized);
        };
        if *calling_ledger != book.token_id {
            warn!(
                pool = %self.account,
                expected = %book.token_id,
                got = %calling_ledger,
                "Refusing deposit from untrusted ledger"
            );
            self.stats.write().deposits_rejected += 1;
            return Err(RejectReason::UntrustedLedger {
                expected: book.token_id.clone(),
                got: calling_ledger.clone(),
            });
        }

        // total never exceeds the notifying ledger's supply.
        book.total_received = book.total_received.saturating_add(amount);
        book.deposits += 1;
        self.stats.write().deposits_accepted += 1;
        debug!(
            pool = %self.account,
            sender = %sender,
            amount = %amount,
            message_len = message.len(),
            "Deposit accepted"
        );
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
