//! Bounded retry with exponential backoff.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::secs;
use crate::core::cancel::Cancellation;
use crate::error::{ImportError, Result};

/// Retry settings shared by both acquisition strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    #[serde(with = "secs")]
    pub base_delay: Duration,
    #[serde(with = "secs")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based): base, 2*base, 4*base...
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_delay < self.base_delay {
            return Err(ImportError::config(
                "retry max_delay must not be below base_delay",
            ));
        }
        Ok(())
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry cap is reached. `op` receives the 0-based attempt number.
///
/// Backoff sleeps are cancellable, so a job that runs out of budget while
/// waiting stops immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &Cancellation,
    label: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "{label} failed, retrying: {e}"
                );
                cancel.sleep(delay).await?;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
