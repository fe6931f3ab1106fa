//! # Shared Errors
//!
//! Error types owned by the shared type layer.

use thiserror::Error;

/// Why an account id string failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAccountId {
    /// Length outside the accepted range.
    #[error("account id length {len} outside {min}..={max}",
        min = crate::AccountId::MIN_LEN,
        max = crate::AccountId::MAX_LEN)]
    Length {
        /// Length of the rejected string.
        len: usize,
    },

    /// A character outside lowercase alphanumerics and separators.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Byte position in the rejected string.
        position: usize,
    },

    /// A leading, trailing, or doubled separator.
    #[error("misplaced separator at position {position}")]
    MisplacedSeparator {
        /// Byte position in the rejected string.
        position: usize,
    },
}
