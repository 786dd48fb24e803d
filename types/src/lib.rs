//! Fundamental types for the pollscan auditor.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, public keys, network identifiers, timestamps
//! and the chain epoch, and the shared parse errors.

pub mod address;
pub mod error;
pub mod keys;
pub mod network;
pub mod time;

pub use address::Address;
pub use error::ParseError;
pub use keys::PublicKey;
pub use network::NetworkId;
pub use time::Timestamp;

/// A block height on the ledger.
pub type BlockHeight = u64;
