//! Nullable ledger — serves canned responses and records every request.

use crate::api::Ledger;
use crate::error::TransportError;
use crate::types::{BlockInfo, TransferEntry};
use pollscan_types::Address;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// One recorded request (for assertions).
#[derive(Clone, Debug, PartialEq)]
pub enum LedgerRequest {
    Transfers { account: String, after_id: Option<u64> },
    BlockAt(u64),
    ChainHeight,
    Importances(Vec<String>),
    ImportancesAt(Vec<String>, u64),
}

/// A test ledger that answers from in-memory fixtures instead of a node.
///
/// Transfer pages are queued per account and served in order, one per call,
/// with an empty page once the queue runs dry — the same shape a paginating
/// scan sees against a real node. Accounts marked failing return an error on
/// every transfer request.
#[derive(Default)]
pub struct NullLedger {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pages: HashMap<String, VecDeque<Vec<TransferEntry>>>,
    blocks: HashMap<u64, BlockInfo>,
    height: u64,
    importances: HashMap<String, f64>,
    historical: HashMap<String, f64>,
    failing: HashSet<String>,
    requests: Vec<LedgerRequest>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current chain height.
    pub fn set_height(&self, height: u64) {
        self.inner.lock().unwrap().height = height;
    }

    /// Queue one transfer page for an account.
    pub fn add_page(&self, account: &Address, entries: Vec<TransferEntry>) {
        self.inner
            .lock()
            .unwrap()
            .pages
            .entry(account.as_str().to_string())
            .or_default()
            .push_back(entries);
    }

    /// Register a block's commit time (chain seconds).
    pub fn add_block(&self, height: u64, time_stamp: i64) {
        self.inner
            .lock()
            .unwrap()
            .blocks
            .insert(height, BlockInfo { time_stamp, height });
    }

    /// Set an account's current importance score.
    pub fn set_importance(&self, account: &Address, importance: f64) {
        self.inner
            .lock()
            .unwrap()
            .importances
            .insert(account.as_str().to_string(), importance);
    }

    /// Set an account's historical importance score (any height).
    pub fn set_historical_importance(&self, account: &Address, importance: f64) {
        self.inner
            .lock()
            .unwrap()
            .historical
            .insert(account.as_str().to_string(), importance);
    }

    /// Make every transfer request for an account fail.
    pub fn fail_transfers(&self, account: &Address) {
        self.inner
            .lock()
            .unwrap()
            .failing
            .insert(account.as_str().to_string());
    }

    /// All requests received so far (for assertions).
    pub fn requests(&self) -> Vec<LedgerRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Ledger for NullLedger {
    async fn transfers(
        &self,
        account: &Address,
        after_id: Option<u64>,
    ) -> Result<Vec<TransferEntry>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(LedgerRequest::Transfers {
            account: account.as_str().to_string(),
            after_id,
        });
        if inner.failing.contains(account.as_str()) {
            return Err(TransportError::RequestFailed("injected failure".into()));
        }
        Ok(inner
            .pages
            .get_mut(account.as_str())
            .and_then(|queue| queue.pop_front())
            .unwrap_or_default())
    }

    async fn block_at(&self, height: u64) -> Result<BlockInfo, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(LedgerRequest::BlockAt(height));
        inner
            .blocks
            .get(&height)
            .copied()
            .ok_or_else(|| TransportError::InvalidResponse(format!("no block at height {height}")))
    }

    async fn chain_height(&self) -> Result<u64, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(LedgerRequest::ChainHeight);
        Ok(inner.height)
    }

    async fn importances(&self, accounts: &[Address]) -> Result<Vec<f64>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(LedgerRequest::Importances(
            accounts.iter().map(|a| a.as_str().to_string()).collect(),
        ));
        Ok(accounts
            .iter()
            .map(|a| inner.importances.get(a.as_str()).copied().unwrap_or(0.0))
            .collect())
    }

    async fn importances_at(
        &self,
        accounts: &[Address],
        height: u64,
    ) -> Result<Vec<f64>, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(LedgerRequest::ImportancesAt(
            accounts.iter().map(|a| a.as_str().to_string()).collect(),
            height,
        ));
        Ok(accounts
            .iter()
            .map(|a| inner.historical.get(a.as_str()).copied().unwrap_or(0.0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        Address::new("TAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
    }

    #[tokio::test]
    async fn serves_pages_in_order_then_empty() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(&a, vec![TransferEntry::transfer(2, 20, "aa", 0)]);
        ledger.add_page(&a, vec![TransferEntry::transfer(1, 10, "bb", 0)]);

        let p1 = ledger.transfers(&a, None).await.unwrap();
        let p2 = ledger.transfers(&a, Some(2)).await.unwrap();
        let p3 = ledger.transfers(&a, Some(1)).await.unwrap();
        assert_eq!(p1[0].meta.id, 2);
        assert_eq!(p2[0].meta.id, 1);
        assert!(p3.is_empty());
    }

    #[tokio::test]
    async fn records_requests() {
        let ledger = NullLedger::new();
        ledger.set_height(77);
        let _ = ledger.chain_height().await.unwrap();
        let _ = ledger.transfers(&account(), Some(9)).await.unwrap();
        assert_eq!(
            ledger.requests(),
            vec![
                LedgerRequest::ChainHeight,
                LedgerRequest::Transfers {
                    account: account().as_str().to_string(),
                    after_id: Some(9)
                },
            ]
        );
    }

    #[tokio::test]
    async fn injected_failure_surfaces() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.fail_transfers(&a);
        assert!(ledger.transfers(&a, None).await.is_err());
    }

    #[tokio::test]
    async fn unknown_importance_is_zero() {
        let ledger = NullLedger::new();
        let a = account();
        let scores = ledger.importances(&[a.clone()]).await.unwrap();
        assert_eq!(scores, vec![0.0]);
        let scores = ledger.importances_at(&[a], 100).await.unwrap();
        assert_eq!(scores, vec![0.0]);
    }
}
