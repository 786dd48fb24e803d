//! Ledger account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an encoded address: base-32 of 25 bytes (version + RIPEMD-160
/// digest + 4-byte checksum), which packs into exactly 40 characters.
pub const ADDRESS_LEN: usize = 40;

/// A ledger account address.
///
/// Addresses are base-32 strings derived from a public key. They are the
/// equality key for vote deduplication, so construction normalizes the two
/// formats found in the wild: the raw 40-character form and the pretty form
/// with `-` separators every six characters. Lowercase input is uppercased.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create an address from a raw string, normalizing case and separators.
    pub fn new(raw: impl Into<String>) -> Self {
        let s: String = raw.into();
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self(normalized)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address is well-formed: 40 characters from the RFC-4648
    /// base-32 alphabet.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ADDRESS_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
