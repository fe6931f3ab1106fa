//! # Domain Module
//!
//! Core domain types for the token ledger.

pub mod balance_store;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod rollback;
pub mod value_objects;

pub use balance_store::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use rollback::*;
pub use value_objects::*;
