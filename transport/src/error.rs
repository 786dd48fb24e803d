use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request to node failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from node: {0}")]
    InvalidResponse(String),

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether a retry could plausibly succeed. A response that arrived but
    /// failed to parse will fail to parse again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidResponse(_))
    }
}
