//! # Shared Wire Types
//!
//! Argument structs that cross a contract boundary and are therefore read
//! by both sides. Ledger-only and pool-only argument types live with their
//! adapters; only formats with two readers belong here.
//!
//! The `sender_id` carried in [`OnTokenReceivedArgs`] is informational
//! payload about who initiated the transfer. It is never an authorization
//! input: receivers authorize against the runtime-authenticated caller.

use crate::account::AccountId;
use crate::{codec, Balance, TransferId};
use serde::{Deserialize, Serialize};

/// Arguments of the `on_token_received` notification a ledger dispatches
/// to a receiver contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnTokenReceivedArgs {
    /// The account whose funds are being transferred.
    pub sender_id: AccountId,
    /// Amount offered, as a decimal string on the wire.
    #[serde(with = "codec::balance_str")]
    pub amount: Balance,
    /// Opaque application payload, hex-encoded on the wire.
    #[serde(with = "codec::hex_bytes", default)]
    pub message: Vec<u8>,
}

/// Arguments of the ledger's self-callback that resolves a pending
/// transfer once the notification has settled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyResultArgs {
    /// The transfer awaiting resolution.
    pub transfer_id: TransferId,
}
