//! # Adapters
//!
//! Runtime-facing edge of the pool receiver.

pub mod contract;

pub use contract::PoolContract;
