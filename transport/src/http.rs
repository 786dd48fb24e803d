//! HTTP client for a ledger node's REST API.

use crate::api::Ledger;
use crate::error::TransportError;
use crate::retry::with_retry;
use crate::types::{BlockInfo, TransferEntry, TransferPage};
use pollscan_types::Address;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for node requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a single ledger node.
///
/// Thin wrapper over `reqwest` (reusable connection pool) that speaks the
/// node's REST dialect and maps failures into [`TransportError`]. Every call
/// goes through bounded retry with backoff.
pub struct NodeClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    /// `http://{host}:{port}`, no trailing slash.
    base_url: String,
}

impl NodeClient {
    /// Create a client for `host:port` with default timeouts.
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: format!("http://{}:{}", host.trim_end_matches('/'), port),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(TransportError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        response.json::<T>().await.map_err(|e| {
            TransportError::InvalidResponse(format!("failed to parse response from {path}: {e}"))
        })
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(TransportError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        response.json::<T>().await.map_err(|e| {
            TransportError::InvalidResponse(format!("failed to parse response from {path}: {e}"))
        })
    }
}

/// Map a reqwest send error into the transport taxonomy.
fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Unreachable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        TransportError::Unreachable(format!("connection failed: {e}"))
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

/// Response of `/chain/height`.
#[derive(Debug, Deserialize)]
struct HeightResponse {
    height: u64,
}

/// Response of `/account/get/batch`.
#[derive(Debug, Deserialize)]
struct AccountBatch {
    data: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    account: AccountState,
}

#[derive(Debug, Deserialize)]
struct AccountState {
    #[serde(default)]
    importance: f64,
}

/// Response of `/account/historical/get/batch`.
#[derive(Debug, Deserialize)]
struct HistoricalBatch {
    data: Vec<HistoricalEntry>,
}

#[derive(Debug, Deserialize)]
struct HistoricalEntry {
    #[serde(default)]
    data: Vec<HistoricalPoint>,
}

#[derive(Debug, Deserialize)]
struct HistoricalPoint {
    #[serde(default)]
    importance: f64,
}

impl Ledger for NodeClient {
    async fn transfers(
        &self,
        account: &Address,
        after_id: Option<u64>,
    ) -> Result<Vec<TransferEntry>, TransportError> {
        let page: TransferPage = with_retry("account/transfers/all", move || {
            let mut query = vec![("address", account.as_str().to_string())];
            if let Some(id) = after_id {
                query.push(("id", id.to_string()));
            }
            async move { self.get_json("/account/transfers/all", &query).await }
        })
        .await?;
        Ok(page.data)
    }

    async fn block_at(&self, height: u64) -> Result<BlockInfo, TransportError> {
        let body = serde_json::json!({ "height": height });
        let body = &body;
        with_retry("block/at/public", move || async move {
            self.post_json("/block/at/public", body).await
        })
        .await
    }

    async fn chain_height(&self) -> Result<u64, TransportError> {
        let response: HeightResponse = with_retry("chain/height", move || async move {
            self.get_json("/chain/height", &[]).await
        })
        .await?;
        Ok(response.height)
    }

    async fn importances(&self, accounts: &[Address]) -> Result<Vec<f64>, TransportError> {
        let body = serde_json::json!({
            "data": accounts
                .iter()
                .map(|a| serde_json::json!({ "account": a.as_str() }))
                .collect::<Vec<_>>(),
        });
        let body = &body;
        let batch: AccountBatch = with_retry("account/get/batch", move || async move {
            self.post_json("/account/get/batch", body).await
        })
        .await?;
        if batch.data.len() != accounts.len() {
            return Err(TransportError::InvalidResponse(format!(
                "account batch returned {} entries for {} accounts",
                batch.data.len(),
                accounts.len()
            )));
        }
        Ok(batch.data.iter().map(|e| e.account.importance).collect())
    }

    async fn importances_at(
        &self,
        accounts: &[Address],
        height: u64,
    ) -> Result<Vec<f64>, TransportError> {
        let body = serde_json::json!({
            "accounts": accounts
                .iter()
                .map(|a| serde_json::json!({ "account": a.as_str() }))
                .collect::<Vec<_>>(),
            "startHeight": height,
            "endHeight": height,
            "incrementBy": 1,
        });
        let body = &body;
        let batch: HistoricalBatch = with_retry("account/historical/get/batch", move || async move {
            self.post_json("/account/historical/get/batch", body).await
        })
        .await?;
        if batch.data.len() != accounts.len() {
            return Err(TransportError::InvalidResponse(format!(
                "historical batch returned {} entries for {} accounts",
                batch.data.len(),
                accounts.len()
            )));
        }
        Ok(batch
            .data
            .iter()
            .map(|e| e.data.first().map(|p| p.importance).unwrap_or(0.0))
            .collect())
    }
}
