//! Timestamps and the chain epoch.
//!
//! The ledger measures time in whole seconds elapsed since its genesis
//! instant, 2015-03-29T00:06:25Z. Block commit times and poll deadlines both
//! end up in that unit; wall-clock input arrives as Unix time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// The chain epoch as a Unix timestamp in seconds (2015-03-29T00:06:25Z).
pub const CHAIN_EPOCH_UNIX: u64 = 1_427_587_585;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Build from a millisecond Unix timestamp (the unit poll deadlines are
    /// stored in on chain).
    pub fn from_unix_millis(millis: u64) -> Self {
        Self(millis / 1000)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Convert to chain time: seconds since the chain epoch. Negative for
    /// instants before genesis.
    pub fn to_chain_secs(&self) -> i64 {
        self.0 as i64 - CHAIN_EPOCH_UNIX as i64
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
