//! Retry with exponential back-off and jitter for Gemini calls.
//!
//! Model replies fail in two ways: the transport or service is briefly
//! unavailable, or the model produced JSON we cannot use. Both are retried.
//! Quota exhaustion is returned immediately since the quota will not reset
//! within any reasonable back-off.

use std::future::Future;
use std::time::Duration;

use crate::error::CuratorError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts and connect failures, HTTP 5xx, short-term rate
/// limits, and malformed or incomplete model JSON.
///
/// **Not retriable:** quota exhaustion, missing configuration, truncated
/// output, client errors, and anything coming from the store.
pub(crate) fn is_retriable(err: &CuratorError) -> bool {
    match err {
        CuratorError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CuratorError::UnexpectedStatus { status, .. } => *status >= 500,
        CuratorError::RateLimited(_)
        | CuratorError::EmptyResponse
        | CuratorError::MalformedJson { .. }
        | CuratorError::MissingField(_) => true,
        CuratorError::NotConfigured
        | CuratorError::InvalidBaseUrl(_)
        | CuratorError::QuotaExceeded(_)
        | CuratorError::Truncated { .. }
        | CuratorError::PlaceNotFound(_)
        | CuratorError::EmptyCatalog
        | CuratorError::Store(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The sleep before retry `n` is `backoff_base_ms × 2ⁿ⁻¹`, jittered by ±25 %
/// and capped at 60 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CuratorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CuratorError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "Gemini call failed; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
