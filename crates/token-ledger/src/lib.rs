//! # Token Ledger
//!
//! Fungible token ledger contract with two-phase transfer notifications.
//!
//! ## Purpose
//!
//! Track balances for a single token and move them between accounts:
//! - Plain transfers settle immediately
//! - Notified transfers lock funds, ping the receiver, and commit or roll
//!   back when the receiver's verdict arrives
//! - A locked amount is never spendable and never lost: every transfer ends
//!   in exactly one of Committed or RolledBack
//!
//! ## Transfer Lifecycle
//!
//! ```text
//!            send(notify=true)
//!                  │
//!                  ▼
//!            ┌──────────┐  on_token_received   ┌──────────────────┐
//!            │  Locked  │ ───────────────────▶ │ NotifyDispatched │
//!            └──────────┘                      └──────────────────┘
//!                  │ send(notify=false)           │            │
//!                  ▼                     accepted │            │ rejected/failed
//!            ┌───────────┐ ◀──────────────────────┘            ▼
//!            │ Committed │                              ┌────────────┐
//!            └───────────┘                              │ RolledBack │
//!                                                       └────────────┘
//! ```
//!
//! ## Conservation
//!
//! At every quiescent point, the sum of all available and locked balances
//! equals the total supply fixed at initialization.
//!
//! ## Module Structure
//!
//! ```text
//! token-ledger/
//! ├── domain/          # BalanceStore, PendingTransfer, RollbackLedger, errors
//! ├── service.rs       # LedgerService: synchronous transfer state machine
//! └── adapters/        # LedgerContract: wire decoding, gas policy, events
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod service;

// Re-exports
pub use adapters::LedgerContract;
pub use domain::{
    invariant_conservation, invariant_locked_covers_pending, AccountFunds, BalanceStore,
    LedgerError, PendingTransfer, RollbackLedger, RollbackRecord, StateMachineViolation,
    TransferState,
};
pub use service::{LedgerConfig, LedgerService, LedgerStats, SendOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
