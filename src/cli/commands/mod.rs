use anyhow::Result;

use crate::board::BoardClient;
use crate::config::BoardSweepConfig;

pub mod config;
pub mod groups;
pub mod sweep;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Validate the configuration, build a client and hand it to `f`
pub async fn with_board_client<F, Fut, R>(config: &BoardSweepConfig, f: F) -> Result<R>
where
    F: FnOnce(BoardClient) -> Fut,
    Fut: std::future::Future<Output = Result<R>>,
{
    config.validate()?;
    let client = BoardClient::new(config)?;
    tracing::debug!(client = ?client, "Board client ready");
    f(client).await
}
