// Opt-in retry for board API calls. Off by default: a failed call aborts the
// sweep unless the user asked for retries.

use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::board::BoardError;
use crate::config::RetryConfig;
use crate::observability::{board_metrics, BoardApiMetrics};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    metrics: &'static BoardApiMetrics,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            metrics: board_metrics(),
        }
    }

    /// Record retries somewhere other than the global counters
    pub fn with_metrics(mut self, metrics: &'static BoardApiMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// A policy that runs every call exactly once
    pub fn disabled() -> Self {
        Self::new(RetryConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.max_attempts > 1
    }

    /// Delays between attempts, one fewer than the number of attempts
    pub fn delays(&self) -> Vec<Duration> {
        if !self.is_enabled() {
            return Vec::new();
        }

        // from_millis(2).factor(b) yields 2b, 4b, 8b, ...; halved afterwards
        let backoff = ExponentialBackoff::from_millis(2)
            .factor(self.config.base_delay_ms)
            .max_delay(Duration::from_millis(
                self.config.max_delay_ms.saturating_mul(2),
            ))
            .map(|delay| delay / 2)
            .take(self.config.max_attempts.saturating_sub(1) as usize);

        if self.config.jitter {
            backoff.map(jitter).collect()
        } else {
            backoff.collect()
        }
    }

    /// Run `operation`, repeating it on retryable errors while attempts remain
    pub async fn execute<F, Fut, T>(&self, operation: &str, action: F) -> Result<T, BoardError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BoardError>>,
    {
        let mut action = action;
        if !self.is_enabled() {
            return action().await;
        }

        debug!(
            operation,
            max_attempts = self.config.max_attempts,
            "Executing board call with retry"
        );

        let metrics = self.metrics;
        let mut attempt: u32 = 0;
        let counted = move || {
            attempt += 1;
            if attempt > 1 {
                metrics.record_retry();
                warn!(operation, attempt, "Retrying board call");
            }
            action()
        };

        RetryIf::start(self.delays(), counted, |error: &BoardError| {
            let retryable = error.is_retryable();
            if retryable {
                debug!(operation, error = %error, "Board call failed with a retryable error");
            }
            retryable
        })
        .await
    }
}
