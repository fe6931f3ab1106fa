//! # Pool Receiver
//!
//! Reference receiver contract: a deposit pool bound to one trusted
//! ledger.
//!
//! ## Purpose
//!
//! Accept token deposits delivered through `on_token_received` and keep a
//! running total:
//! - Deposits are accepted only when the notifying contract is the ledger
//!   the pool was initialized with
//! - Any other notifier is refused, which makes the ledger roll the
//!   transfer back
//! - The sender named in the payload is recorded, never trusted: the
//!   notifier's identity comes from the runtime alone
//!
//! ## Module Structure
//!
//! ```text
//! pool-receiver/
//! ├── errors.rs        # PoolError
//! ├── service.rs       # PoolService: deposit bookkeeping
//! └── adapters/        # PoolContract: wire decoding, events
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod errors;
pub mod service;

// Re-exports
pub use adapters::PoolContract;
pub use errors::PoolError;
pub use service::{PoolService, PoolStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
