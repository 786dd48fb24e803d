//! The abstract ledger interface the auditor depends on.

use crate::error::TransportError;
use crate::types::{BlockInfo, TransferEntry};
use pollscan_types::Address;

/// Read-only view of a ledger node.
///
/// Pagination contract for [`Ledger::transfers`]: the node returns bounded
/// pages in descending meta-id order (newest first); passing the last meta id
/// of a page as `after_id` yields the next, strictly older, page; an empty
/// page means the history is exhausted.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// One page of transfer transactions addressed to or from `account`.
    async fn transfers(
        &self,
        account: &Address,
        after_id: Option<u64>,
    ) -> Result<Vec<TransferEntry>, TransportError>;

    /// The block at a given height (commit timestamp in chain seconds).
    async fn block_at(&self, height: u64) -> Result<BlockInfo, TransportError>;

    /// The current chain height.
    async fn chain_height(&self) -> Result<u64, TransportError>;

    /// Current importance score per account, aligned with the input order.
    /// Accounts without a score report 0.
    async fn importances(&self, accounts: &[Address]) -> Result<Vec<f64>, TransportError>;

    /// Importance score per account as of `height`, aligned with the input
    /// order. Accounts without a score report 0.
    async fn importances_at(
        &self,
        accounts: &[Address],
        height: u64,
    ) -> Result<Vec<f64>, TransportError>;
}
