//! # Account Identifiers
//!
//! Validated account names for contracts and signers.
//!
//! An account id is a human-readable handle such as `vitalik`, `pool` or
//! `token.registry`. Validation happens at construction so that every
//! `AccountId` in the system is known to be well-formed; raw strings from
//! the wire are rejected before they reach any balance bookkeeping.

use crate::errors::InvalidAccountId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated account identifier.
///
/// ## Rules
///
/// - Length between [`AccountId::MIN_LEN`] and [`AccountId::MAX_LEN`].
/// - Lowercase ASCII alphanumerics, with `.`, `_` and `-` as separators.
/// - Separators must be surrounded by alphanumerics: never leading,
///   trailing, or adjacent to another separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Minimum length of an account id.
    pub const MIN_LEN: usize = 2;

    /// Maximum length of an account id.
    pub const MAX_LEN: usize = 64;

    /// Create a validated account id.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidAccountId> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// View the account id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), InvalidAccountId> {
        if id.len() < Self::MIN_LEN || id.len() > Self::MAX_LEN {
            return Err(InvalidAccountId::Length { len: id.len() });
        }

        // A virtual separator precedes the string, so a leading separator
        // is caught by the same adjacency rule as "a--b".
        let mut prev_was_separator = true;
        for (position, byte) in id.bytes().enumerate() {
            match byte {
                b'a'..=b'z' | b'0'..=b'9' => prev_was_separator = false,
                b'.' | b'_' | b'-' => {
                    if prev_was_separator {
                        return Err(InvalidAccountId::MisplacedSeparator { position });
                    }
                    prev_was_separator = true;
                }
                _ => {
                    return Err(InvalidAccountId::InvalidCharacter {
                        character: id[position..].chars().next().unwrap_or('?'),
                        position,
                    })
                }
            }
        }
        if prev_was_separator {
            return Err(InvalidAccountId::MisplacedSeparator { position: id.len() - 1 });
        }
        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for AccountId {
    type Err = InvalidAccountId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}
