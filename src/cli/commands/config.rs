use anyhow::Result;

use crate::cli::commands::Command;
use crate::config::BoardSweepConfig;

pub struct ConfigCommand {
    pub config: BoardSweepConfig,
}

impl ConfigCommand {
    pub fn new(config: BoardSweepConfig) -> Self {
        Self { config }
    }
}

impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", self.config.to_redacted_toml()?);
        if let Err(e) = self.config.validate() {
            println!();
            println!("⚠️  Configuration is incomplete:");
            println!("{e}");
        }
        Ok(())
    }
}
