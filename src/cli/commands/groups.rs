use anyhow::Result;

use crate::board::BoardOps;
use crate::cli::commands::{with_board_client, Command};
use crate::config::BoardSweepConfig;

pub struct GroupsCommand {
    pub config: BoardSweepConfig,
}

impl GroupsCommand {
    pub fn new(config: BoardSweepConfig) -> Self {
        Self { config }
    }
}

impl Command for GroupsCommand {
    async fn execute(&self) -> Result<()> {
        with_board_client(&self.config, |client| async move {
            let groups = client.list_groups().await?;
            if groups.is_empty() {
                println!("📋 Board {} has no groups", client.board_id());
                return Ok(());
            }

            println!("📋 Board {} groups:", client.board_id());
            for group in groups {
                println!("   → {group}");
            }
            Ok(())
        })
        .await
    }
}
