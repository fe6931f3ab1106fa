//! # Shared Types Crate
//!
//! This crate contains the account identifiers, balance primitives, wire
//! argument types, and the receiver capability trait shared by every
//! contract in the protocol.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-contract types are defined here.
//! - **Envelope-Only Identity**: Authorization decisions use the caller
//!   identity authenticated by the runtime, never identity fields carried
//!   inside payloads.
//! - **String Balances on the Wire**: Balances are `u128` in memory but
//!   travel as decimal strings in JSON, which cannot represent the full
//!   `u128` range as numbers.

pub mod account;
pub mod codec;
pub mod errors;
pub mod methods;
pub mod receiver;
pub mod wire;

pub use account::AccountId;
pub use errors::InvalidAccountId;
pub use receiver::{RejectReason, TokenReceiver};
pub use wire::{NotifyResultArgs, OnTokenReceivedArgs};

/// Token amount. Balances never go negative; depletion is expressed by
/// reaching zero.
pub type Balance = u128;

/// Correlation identifier for a single transfer through the
/// lock/notify/commit-or-rollback cycle.
pub type TransferId = uuid::Uuid;
