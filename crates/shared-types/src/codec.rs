//! # Wire Codec Helpers
//!
//! Serde adapters for fields whose JSON representation differs from their
//! in-memory type:
//!
//! - [`balance_str`] carries `u128` balances as decimal strings, since JSON
//!   numbers cannot hold the full `u128` range.
//! - [`hex_bytes`] carries opaque byte payloads as lowercase hex strings.

/// Serialize a [`crate::Balance`] as a decimal string.
///
/// Use with `#[serde(with = "codec::balance_str")]`.
pub mod balance_str {
    use crate::Balance;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize the balance as its decimal string form.
    pub fn serialize<S: Serializer>(value: &Balance, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Parse a balance from its decimal string form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<Balance>().map_err(serde::de::Error::custom)
    }
}

/// Serialize a byte vector as a lowercase hex string.
///
/// Use with `#[serde(with = "codec::hex_bytes")]`.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize the bytes as lowercase hex.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    /// Decode bytes from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(&text).map_err(serde::de::Error::custom)
    }
}
