//! Board sweep: walk every group, merge duplicate items, archive the extras.
//!
//! Groups are processed one after another and every write is awaited before
//! the next one is issued, so within a cluster the survivor update always
//! lands before its archives. A failure stops the sweep where it is; writes
//! already applied stay applied.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::board::{BoardError, BoardId, BoardOps, GroupId, ItemId};
use crate::observability::{board_metrics, OperationTimer};
use crate::reconcile::{find_duplicates, Action, DuplicateCluster};
use crate::telemetry::{create_sweep_span, generate_correlation_id};

#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Plan merges without writing anything
    pub dry_run: bool,
    /// Restrict the sweep to these groups; empty means every group
    pub groups: Vec<GroupId>,
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("listing groups of board {board_id} failed: {source}")]
    ListGroups {
        board_id: BoardId,
        #[source]
        source: BoardError,
    },
    #[error("listing items of group {group_id} failed: {source}")]
    ListItems {
        group_id: GroupId,
        #[source]
        source: BoardError,
    },
    #[error("updating survivor {item_id} in group {group_id} failed: {source}")]
    UpdateSurvivor {
        group_id: GroupId,
        item_id: ItemId,
        #[source]
        source: BoardError,
    },
    /// The survivor already holds the merged total; `unarchived` lists the
    /// failed duplicate and every duplicate after it that is still on the board.
    #[error("archiving duplicate {item_id} in group {group_id} failed: {source}")]
    ArchiveDuplicate {
        group_id: GroupId,
        survivor: ItemId,
        item_id: ItemId,
        unarchived: Vec<ItemId>,
        #[source]
        source: BoardError,
    },
}

/// One merged cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMerge {
    pub name: String,
    pub survivor: ItemId,
    pub archived: Vec<ItemId>,
    pub total: f64,
}

impl From<&DuplicateCluster> for ClusterMerge {
    fn from(cluster: &DuplicateCluster) -> Self {
        Self {
            name: cluster.name.clone(),
            survivor: cluster.survivor.id.clone(),
            archived: cluster.duplicates.iter().map(|item| item.id.clone()).collect(),
            total: cluster.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub items_scanned: usize,
    pub merges: Vec<ClusterMerge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub board_id: BoardId,
    pub dry_run: bool,
    pub groups: Vec<GroupSummary>,
}

impl SweepSummary {
    pub fn clusters_resolved(&self) -> usize {
        self.groups.iter().map(|g| g.merges.len()).sum()
    }

    pub fn items_archived(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.merges.iter())
            .map(|m| m.archived.len())
            .sum()
    }

    pub fn items_scanned(&self) -> usize {
        self.groups.iter().map(|g| g.items_scanned).sum()
    }
}

pub struct BoardSweeper<'a, B: BoardOps + ?Sized> {
    board: &'a B,
    options: SweepOptions,
}

impl<'a, B: BoardOps + ?Sized> BoardSweeper<'a, B> {
    pub fn new(board: &'a B) -> Self {
        Self {
            board,
            options: SweepOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SweepOptions) -> Self {
        self.options = options;
        self
    }

    /// Sweep the board once
    pub async fn sweep(&self) -> Result<SweepSummary, SweepError> {
        let board_id = self.board.board_id();
        let correlation_id = generate_correlation_id();
        let span = create_sweep_span(board_id.0, self.options.dry_run, &correlation_id);

        async {
            let timer = OperationTimer::new("board_sweep");
            let result = self.run(board_id).await;
            timer.finish();
            board_metrics().log_stats();
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, board_id: BoardId) -> Result<SweepSummary, SweepError> {
        let groups = self
            .board
            .list_groups()
            .await
            .map_err(|source| SweepError::ListGroups { board_id, source })?;

        let groups = self.select_groups(groups);
        info!(groups = groups.len(), "Sweeping board");

        let mut summary = SweepSummary {
            board_id,
            dry_run: self.options.dry_run,
            groups: Vec::with_capacity(groups.len()),
        };
        for group_id in groups {
            let group_summary = self.sweep_group(group_id).await?;
            summary.groups.push(group_summary);
        }

        info!(
            clusters = summary.clusters_resolved(),
            archived = summary.items_archived(),
            "Done combining duplicates"
        );
        Ok(summary)
    }

    fn select_groups(&self, on_board: Vec<GroupId>) -> Vec<GroupId> {
        if self.options.groups.is_empty() {
            return on_board;
        }

        for requested in &self.options.groups {
            if !on_board.contains(requested) {
                warn!(group.id = %requested, "Requested group is not on the board, skipping");
            }
        }
        on_board
            .into_iter()
            .filter(|group_id| self.options.groups.contains(group_id))
            .collect()
    }

    async fn sweep_group(&self, group_id: GroupId) -> Result<GroupSummary, SweepError> {
        let items = self
            .board
            .list_items(&group_id)
            .await
            .map_err(|source| SweepError::ListItems {
                group_id: group_id.clone(),
                source,
            })?;

        let clusters = find_duplicates(&items);
        let mut merges = Vec::with_capacity(clusters.len());

        for cluster in &clusters {
            if !self.options.dry_run {
                self.apply(&group_id, cluster).await?;
            }

            info!(
                group.id = %group_id,
                name = %cluster.name,
                count = cluster.len(),
                total = cluster.total(),
                dry_run = self.options.dry_run,
                "Combined {} items named \"{}\" in group {}",
                cluster.len(),
                cluster.name,
                group_id
            );
            merges.push(ClusterMerge::from(cluster));
        }

        Ok(GroupSummary {
            group_id,
            items_scanned: items.len(),
            merges,
        })
    }

    async fn apply(&self, group_id: &GroupId, cluster: &DuplicateCluster) -> Result<(), SweepError> {
        for action in cluster.actions() {
            match action {
                Action::UpdateSurvivor { item_id, value } => {
                    if let Err(source) = self.board.update_numeric_field(&item_id, value).await {
                        return Err(SweepError::UpdateSurvivor {
                            group_id: group_id.clone(),
                            item_id,
                            source,
                        });
                    }
                }
                Action::ArchiveDuplicate { item_id } => {
                    if let Err(source) = self.board.archive_item(&item_id).await {
                        let unarchived = cluster
                            .duplicates
                            .iter()
                            .map(|item| item.id.clone())
                            .skip_while(|id| *id != item_id)
                            .collect();
                        return Err(SweepError::ArchiveDuplicate {
                            group_id: group_id.clone(),
                            survivor: cluster.survivor.id.clone(),
                            item_id,
                            unarchived,
                            source,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
