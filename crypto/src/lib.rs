//! Address derivation primitives for the pollscan auditor.
//!
//! - **Keccak-256** and **RIPEMD-160** digests (the ledger's address scheme)
//! - **Base-32** encoding with the RFC-4648 uppercase alphabet
//! - Account address derivation from a signer public key

pub mod address;
pub mod base32;
pub mod hash;

pub use address::derive_address;
pub use base32::b32encode;
pub use hash::{keccak256, ripemd160};
