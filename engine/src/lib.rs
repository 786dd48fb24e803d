//! Vote-counting engine for the pollscan auditor.
//!
//! The pipeline, leaf to root:
//! - [`scanner`] — exhaustively walks an account's transfer history and
//!   returns the chronologically ordered messages matching a tag.
//! - [`height`] — resolves a wall-clock deadline to the last block committed
//!   before it.
//! - [`poll`] — the poll definition reconstructed from tagged messages on the
//!   poll account.
//! - [`tally`] — deduplication, multi-vote invalidation, and the two
//!   weighting modes.
//! - [`audit`] — ties the pieces together into one top-to-bottom run.

pub mod audit;
pub mod error;
pub mod height;
pub mod poll;
pub mod scanner;
pub mod tally;

pub use audit::{audit_poll, poll_definition, PollAudit};
pub use error::AuditError;
pub use poll::{PollDefinition, PollFormData, PollOptions, WeightingMode};
pub use scanner::ScannedTransaction;
pub use tally::{OptionResult, TallyResult};
