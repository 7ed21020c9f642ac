// board-sweep library - duplicate item merging for monday.com boards
// This exposes the core components for testing and integration

pub mod board;
pub mod cli;
pub mod config;
pub mod observability;
pub mod reconcile;
pub mod sweep;
pub mod telemetry;

// Re-export key types for easy access
pub use board::{BoardClient, BoardError, BoardOps, GroupId, Item, ItemId, NumericValue};
pub use config::BoardSweepConfig;
pub use reconcile::{find_duplicates, partition_by_name, reconcile, Action, DuplicateCluster};
pub use sweep::{BoardSweeper, SweepError, SweepOptions, SweepSummary};
pub use telemetry::{generate_correlation_id, init_telemetry};
