//! Advisory slow-operation warnings around store calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

/// Await `future` to completion, logging once if it runs past `threshold`.
///
/// The future is never cancelled; it always completes or fails on its own.
pub async fn with_slow_warning<F, T>(operation: &str, threshold: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    let started = Instant::now();
    tokio::pin!(future);

    let deadline = tokio::time::sleep(threshold);
    tokio::pin!(deadline);

    tokio::select! {
        biased;
        output = &mut future => return output,
        _ = &mut deadline => {
            warn!(
                operation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "group type operation is taking longer than expected"
            );
        }
    }

    future.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_returns_value() {
        let value = with_slow_warning("fast", Duration::from_secs(1), async { 7 }).await;
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_is_not_cancelled() {
        let started = Instant::now();
        let value = with_slow_warning("slow", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        })
        .await;

        assert_eq!(value, "done");
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_pass_through() {
        let result: Result<(), &str> =
            with_slow_warning("failing", Duration::from_millis(10), async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
    }
}
