//! Ledger node interface for the pollscan auditor.
//!
//! Everything the vote-counting engine needs from the outside world comes
//! through the [`Ledger`] trait: transfer history pages, block commit times,
//! the current chain height, and (historical) account importance scores.
//! The rest of the workspace depends only on the trait.
//!
//! Implementations:
//! - [`NodeClient`] — HTTP client against a node's REST API, with request
//!   timeouts and bounded retry.
//! - [`NullLedger`] — in-memory double for tests: canned responses, request
//!   recording, failure injection.

pub mod api;
pub mod error;
pub mod http;
pub mod null;
pub mod retry;
pub mod types;

pub use api::Ledger;
pub use error::TransportError;
pub use http::NodeClient;
pub use null::{LedgerRequest, NullLedger};
pub use types::{
    BlockInfo, TransactionData, TransferEntry, TransferMeta, WireMessage, MULTISIG_KIND,
    PLAIN_MESSAGE_KIND, SECURE_MESSAGE_KIND, TRANSFER_KIND,
};
