use anyhow::Result;
use clap::Parser;

use board_sweep::cli::commands::config::ConfigCommand;
use board_sweep::cli::commands::groups::GroupsCommand;
use board_sweep::cli::commands::sweep::SweepCommand;
use board_sweep::cli::commands::Command;
use board_sweep::cli::{Cli, Commands};
use board_sweep::config::BoardSweepConfig;
use board_sweep::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    BoardSweepConfig::load_env_file()?;
    let mut config = BoardSweepConfig::load(cli.config.as_deref())?;

    // Command line flags win over every other source
    if let Some(board_id) = cli.board_id {
        config.board.board_id = Some(board_id);
    }
    if let Some(column_id) = cli.column_id {
        config.board.column_id = column_id;
    }
    if cli.retry {
        config.retry.enabled = true;
    }

    init_telemetry(&config.observability)?;

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            // Default behavior: no subcommand runs a full sweep
            None => SweepCommand::new(config).execute().await,
            Some(Commands::Sweep {
                dry_run,
                groups,
                json,
            }) => {
                SweepCommand::new(config)
                    .with_dry_run(dry_run)
                    .with_groups(groups)
                    .with_json(json)
                    .execute()
                    .await
            }
            Some(Commands::Groups) => GroupsCommand::new(config).execute().await,
            Some(Commands::Config) => ConfigCommand::new(config).execute().await,
        }
    })
}
