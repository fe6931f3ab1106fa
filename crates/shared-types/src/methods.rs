//! # Protocol Method Names
//!
//! Wire-level method names for cross-contract dispatch. Contracts route by
//! these constants instead of scattering string literals through adapters,
//! and a receiver advertises support simply by implementing the entry
//! points named here.

/// Methods exposed by a ledger contract.
pub mod ledger {
    /// Constructor: `new(owner_id, total_supply)`.
    pub const NEW: &str = "new";
    /// Transfer entry point: `send(new_owner_id, amount, message, notify)`.
    pub const SEND: &str = "send";
    /// View: fixed total supply.
    pub const GET_TOTAL_SUPPLY: &str = "get_total_supply";
    /// View: available balance of one account.
    pub const GET_BALANCE: &str = "get_balance";
    /// View: locked balance of one account.
    pub const GET_LOCKED_BALANCE: &str = "get_locked_balance";
    /// View: lifetime count of rolled-back transfers.
    pub const GET_ROLLBACK_COUNT: &str = "get_rollback_count";
    /// View: state of a single transfer by id.
    pub const GET_TRANSFER_STATE: &str = "get_transfer_state";
    /// Opaque byte-payload intake.
    pub const PROCESS_BYTES: &str = "process_bytes";
    /// Self-callback reporting the outcome of a receiver notification.
    /// Only callable by the ledger account itself.
    pub const HANDLE_NOTIFY_RESULT: &str = "handle_notify_result";
}

/// Methods expected of a receiver contract.
pub mod receiver {
    /// Constructor: `new(token_id)`.
    pub const NEW: &str = "new";
    /// View: does this contract accept protocol deposits?
    pub const IS_RECEIVER: &str = "is_receiver";
    /// Deposit notification: `on_token_received(sender_id, amount, message)`.
    pub const ON_TOKEN_RECEIVED: &str = "on_token_received";
    /// View: cumulative amount accepted.
    pub const GET_TOTAL_RECEIVED: &str = "get_total_received";
}
