//! # Promise Bus - Asynchronous Contract Runtime
//!
//! In-memory message-passing runtime for contracts that communicate only
//! through scheduled calls and promise callbacks.
//!
//! ## Execution Rules
//!
//! - **Contracts never call each other directly** - every interaction is a
//!   receipt queued on the runtime
//! - One receipt executes at a time; a method runs to completion before any
//!   other receipt starts
//! - A scheduled call with a callback produces exactly one callback receipt,
//!   whether the call succeeds or fails
//!
//! ## Call Flow
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Contract A  │                    │  Contract B  │
//! │              │   schedule()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!        ↑               ▼                    ↑
//!        │         ┌──────────────┐          │
//!        └──────── │ Receipt queue│ ─────────┘
//!        callback  │   (FIFO)     │  dispatch
//!                  └──────────────┘
//! ```
//!
//! ## Gas
//!
//! Every receipt carries a finite [`GasBudget`]. Dispatch charges a base
//! cost; scheduling cross-contract calls charges the attached gas plus any
//! callback reserve up front, so a callee can never starve the callback
//! that reports its outcome.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod call;
pub mod config;
pub mod contract;
pub mod events;
pub mod gas;
pub mod publisher;
pub mod runtime;
pub mod subscriber;

// Re-export main types
pub use call::{CallContext, CallFailure, PromiseResult};
pub use config::RuntimeConfig;
pub use contract::{CallbackSpec, ChangeOutcome, Contract, OutgoingCall};
pub use events::{EventFilter, EventTopic, ProtocolEvent};
pub use gas::{Gas, GasBudget, GasExhausted, STANDARD_CALL_GAS};
pub use publisher::{EventPublisher, EventSubscriber, InMemoryEventBus};
pub use runtime::{PromiseRuntime, RuntimeError, RuntimeStats};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
