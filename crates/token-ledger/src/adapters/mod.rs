//! # Adapters
//!
//! Runtime-facing edges of the token ledger.

pub mod contract;

pub use contract::LedgerContract;
