//! Deadline wrapper for store round-trips.

use std::future::Future;
use std::time::Duration;

use blog_core::RepoError;

/// Run `fut` under `limit`, failing with `RepoError::Timeout` when it
/// doesn't finish in time. There is no retry.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, RepoError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = millis(limit),
                "Store call exceeded its deadline"
            );
            Err(RepoError::timeout(limit))
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(limit: Duration) -> u64 {
    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
}
