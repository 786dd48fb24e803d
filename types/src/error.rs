//! Parse errors shared across crates.

use thiserror::Error;

/// Errors from parsing wire-level key and address strings.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid account address: {0}")]
    InvalidAddress(String),
}
