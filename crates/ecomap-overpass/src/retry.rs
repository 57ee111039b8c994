//! Retry with exponential backoff and jitter for Overpass requests.
//!
//! Public interpreters shed load aggressively (429, 504), so a single retry
//! after a short pause recovers most transient failures. Malformed bodies and
//! client errors are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::OverpassError;

/// Upper bound for a single backoff sleep.
const MAX_DELAY_SECS: u64 = 30;

/// Returns `true` if `err` represents a transient condition worth retrying.
///
/// Retriable:
/// - [`OverpassError::Http`] on timeouts, connection failures, or 5xx.
/// - [`OverpassError::RateLimited`]: HTTP 429.
/// - [`OverpassError::UnexpectedStatus`] with a 5xx status (gateway timeouts).
///
/// Not retriable: malformed bodies, 4xx statuses, invalid endpoints, and the
/// overall [`OverpassError::Timeout`] (the time budget is already spent).
pub(crate) fn is_retriable(err: &OverpassError) -> bool {
    match err {
        OverpassError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        OverpassError::RateLimited { .. } => true,
        OverpassError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        OverpassError::Timeout { .. }
        | OverpassError::MalformedResponse { .. }
        | OverpassError::InvalidEndpoint { .. } => false,
    }
}

/// Executes `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The sleep before retry `n` is `backoff_base_secs * 2^(n-1)` seconds with
/// ±25 % jitter, capped at [`MAX_DELAY_SECS`]. A 429 that carries a longer
/// `Retry-After` is honoured up to the same cap.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, OverpassError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OverpassError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(backoff_base_secs, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient Overpass error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Longest total sleep `retry_with_backoff` can spend between attempts.
pub(crate) fn max_total_backoff(max_retries: u32, backoff_base_secs: u64) -> Duration {
    if backoff_base_secs == 0 {
        return Duration::ZERO;
    }
    // A 429 may ask for the full cap on any retry; jitter adds up to 25 %.
    let per_retry_ms = MAX_DELAY_SECS * 1_250;
    Duration::from_millis(per_retry_ms.saturating_mul(u64::from(max_retries)))
}

fn backoff_delay(backoff_base_secs: u64, attempt: u32, err: &OverpassError) -> Duration {
    let computed = backoff_base_secs
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_SECS);
    let requested = match err {
        OverpassError::RateLimited { retry_after_secs } if backoff_base_secs > 0 => {
            (*retry_after_secs).min(MAX_DELAY_SECS)
        }
        _ => 0,
    };
    let base_ms = computed.max(requested).saturating_mul(1_000);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered_ms = (base_ms as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(jittered_ms)
}
