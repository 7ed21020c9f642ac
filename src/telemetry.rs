use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` wins over the configured level. Stdout stays free for command
/// output such as the JSON sweep summary.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!("board-sweep telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the events of one sweep
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create the span a sweep runs in
pub fn create_sweep_span(board_id: u64, dry_run: bool, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "board_sweep",
        board.id = board_id,
        dry_run = dry_run,
        correlation.id = correlation_id,
    )
}
