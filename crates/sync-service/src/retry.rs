//! Bounded retry of the calls to the data transport service.

use std::time::Duration;

/// The upper bound on the delay between two attempts.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// A type used for retrying transient failures of remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    /// Maximum number of retry attempts. None means infinite retries.
    pub max_retries: Option<usize>,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
}

impl Default for Retry {
    fn default() -> Self {
        Self { max_retries: Some(3), initial_delay_ms: 100, exponential_backoff: true }
    }
}

impl Retry {
    /// Creates a new [`Retry`] with the specified parameters.
    pub const fn new(
        max_retries: Option<usize>,
        initial_delay_ms: u64,
        exponential_backoff: bool,
    ) -> Self {
        Self { max_retries, initial_delay_ms, exponential_backoff }
    }

    /// Returns a [`Retry`] which never retries.
    pub const fn none() -> Self {
        Self::new(Some(0), 0, false)
    }

    /// Returns the delay to wait before the provided attempt, starting at 1.
    pub fn delay(&self, attempt: usize) -> Duration {
        let delay_ms = if self.exponential_backoff {
            let shift = attempt.saturating_sub(1).min(u32::MAX as usize) as u32;
            self.initial_delay_ms.saturating_mul(1u64.checked_shl(shift).unwrap_or(u64::MAX))
        } else {
            self.initial_delay_ms
        };
        Duration::from_millis(delay_ms).min(MAX_DELAY)
    }

    /// Retries the asynchronous operation with the configured strategy, returning the last error
    /// once the attempts are exhausted.
    pub async fn retry<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Debug,
    {
        let mut attempt: usize = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if self.max_retries.is_some_and(|max| attempt >= max) {
                        return Err(error)
                    }

                    attempt += 1;
                    tracing::debug!(
                        target: "rollup_sync::service",
                        operation = operation_name,
                        ?error,
                        attempt,
                        "Retrying remote call"
                    );
                    tokio::time::sleep(self.delay(attempt)).await;
                }
            }
        }
    }
}
