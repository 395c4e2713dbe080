//! Fixed-interval retry with cancellation.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ScrapeError;
use crate::settings::RetryPolicy;

/// Run `op` until it succeeds or `policy.max_attempts` attempts have failed.
///
/// The interval is waited before every retry, never before the first
/// attempt. On exhaustion every attempt's error is returned, oldest first,
/// inside [`ScrapeError::RetriesExhausted`]. Cancellation is checked during
/// the wait and while an attempt is in flight; a cancelled run returns
/// [`ScrapeError::Cancelled`].
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    cancel: &CancellationToken,
    what: &str,
    mut op: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let mut attempts = Vec::new();

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                _ = tokio::time::sleep(policy.interval()) => {}
            }
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ScrapeError::Cancelled),
            r = op() => r,
        };

        match result {
            Ok(value) => return Ok(value),
            Err(ScrapeError::Cancelled) => return Err(ScrapeError::Cancelled),
            Err(e) => {
                log::debug!(
                    "{what}: attempt {}/{} failed: {e}",
                    attempt + 1,
                    policy.max_attempts
                );
                attempts.push(e);
            }
        }
    }

    Err(ScrapeError::RetriesExhausted {
        what: what.to_string(),
        attempts,
    })
}

#[cfg(test)]
#[path = "tests/retry_tests.rs"]
mod tests;
