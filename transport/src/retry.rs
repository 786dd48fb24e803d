//! Bounded retry with exponential backoff around transport calls.
//!
//! A failed audit run restarts from scratch, so transient node hiccups are
//! worth absorbing here rather than surfacing. Retries are bounded and only
//! attempted for errors a retry could fix.

use crate::error::TransportError;
use std::future::Future;
use std::time::Duration;

/// Attempts per request before giving up.
const MAX_ATTEMPTS: u32 = 3;
/// Initial backoff (ms).
const INITIAL_BACKOFF_MS: u64 = 500;
/// Maximum backoff (ms).
const MAX_BACKOFF_MS: u64 = 5_000;

/// Run `op` until it succeeds, retrying retryable failures up to
/// [`MAX_ATTEMPTS`] with exponential backoff. `label` names the request in
/// warning logs.
pub async fn with_retry<T, F, Fut>(label: &str, mut op: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut backoff_ms = INITIAL_BACKOFF_MS;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS && e.is_retryable() => {
                tracing::warn!("{label}: attempt {attempt} failed ({e}), retrying in {backoff_ms}ms");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Cell::new(0u32);
        let result = with_retry("test", || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n < 3 {
                    Err(TransportError::Unreachable("down".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry("test", || {
            calls.set(calls.get() + 1);
            async { Err(TransportError::RequestFailed("HTTP status 500".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_responses_are_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry("test", || {
            calls.set(calls.get() + 1);
            async { Err(TransportError::InvalidResponse("bad json".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
