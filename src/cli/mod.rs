use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "board-sweep")]
#[command(about = "Merge duplicate items on a monday.com board")]
#[command(long_about = "board-sweep walks every group of a board, finds items that share a name, \
                       adds their numbers column onto the first one and archives the rest. \
                       Run without a subcommand to sweep the configured board.")]
pub struct Cli {
    /// Configuration file (defaults to ./board-sweep.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board to sweep, overrides BOARD_ID
    #[arg(long, global = true, value_name = "ID")]
    pub board_id: Option<u64>,

    /// Numbers column to sum, overrides NUMBER_COLUMN_ID
    #[arg(long, global = true, value_name = "COLUMN")]
    pub column_id: Option<String>,

    /// Retry transient API failures with exponential backoff
    #[arg(long, global = true)]
    pub retry: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge duplicate items in every group of the board
    Sweep {
        /// Show what would be merged without making changes
        #[arg(long, help = "Preview merges without updating or archiving anything")]
        dry_run: bool,
        /// Only sweep these groups
        #[arg(long = "group", value_name = "GROUP_ID", help = "Restrict the sweep to a group (repeatable)")]
        groups: Vec<String>,
        /// Print the sweep summary as JSON
        #[arg(long, help = "Print the summary as JSON on stdout")]
        json: bool,
    },
    /// List the group ids of the board
    Groups,
    /// Show the effective configuration with the token masked
    Config,
}
