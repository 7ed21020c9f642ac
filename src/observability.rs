use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Board API usage metrics
#[derive(Debug, Default)]
pub struct BoardApiMetrics {
    pub total_requests: AtomicU64,
    pub retries: AtomicU64,
    pub errors: AtomicU64,
}

impl BoardApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> BoardApiStats {
        BoardApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            requests = stats.total_requests,
            retries = stats.retries,
            errors = stats.errors,
            "Board API metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardApiStats {
    pub total_requests: u64,
    pub retries: u64,
    pub errors: u64,
}

/// Global metrics instance
static BOARD_METRICS: std::sync::LazyLock<BoardApiMetrics> =
    std::sync::LazyLock::new(BoardApiMetrics::new);

pub fn board_metrics() -> &'static BoardApiMetrics {
    &BOARD_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}
