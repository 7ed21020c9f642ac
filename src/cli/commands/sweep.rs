use anyhow::Result;

use crate::board::GroupId;
use crate::cli::commands::{with_board_client, Command};
use crate::config::BoardSweepConfig;
use crate::sweep::{BoardSweeper, SweepError, SweepOptions, SweepSummary};

pub struct SweepCommand {
    pub config: BoardSweepConfig,
    pub dry_run: bool,
    pub groups: Vec<String>,
    pub json: bool,
}

impl SweepCommand {
    pub fn new(config: BoardSweepConfig) -> Self {
        Self {
            config,
            dry_run: false,
            groups: Vec::new(),
            json: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn options(&self) -> SweepOptions {
        SweepOptions {
            dry_run: self.dry_run,
            groups: self.groups.iter().map(|g| GroupId(g.clone())).collect(),
        }
    }
}

impl Command for SweepCommand {
    async fn execute(&self) -> Result<()> {
        if !self.json {
            if self.dry_run {
                println!("🔍 DRY RUN - no items will be updated or archived");
            }
            println!("🧹 Sweeping board for duplicate items...");
            println!();
        }

        with_board_client(&self.config, |client| async move {
            let sweeper = BoardSweeper::new(&client).with_options(self.options());
            match sweeper.sweep().await {
                Ok(summary) => {
                    if self.json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        print_summary(&summary);
                    }
                    Ok(())
                }
                Err(e) => {
                    // stdout stays reserved for the summary; the error itself is reported by main
                    for line in failure_guidance(&e) {
                        eprintln!("{line}");
                    }
                    Err(e.into())
                }
            }
        })
        .await
    }
}

/// What the board looks like after a failed sweep and what to do before running again
pub fn failure_guidance(error: &SweepError) -> Vec<String> {
    let mut lines = vec![
        "⚠️  The board is partially swept: groups before the failure were merged, later groups were not touched."
            .to_string(),
    ];

    match error {
        SweepError::ArchiveDuplicate {
            group_id,
            survivor,
            unarchived,
            ..
        } => {
            let leftovers: Vec<String> = unarchived.iter().map(|id| id.to_string()).collect();
            lines.push(format!(
                "   Item {survivor} in group {group_id} already holds the merged total."
            ));
            lines.push(format!(
                "   Archive these duplicates by hand before re-running, or their values will be added again: {}",
                leftovers.join(", ")
            ));
        }
        SweepError::UpdateSurvivor { group_id, .. } => {
            lines.push(format!(
                "   No item in the failing cluster of group {group_id} was changed. Re-running will retry it."
            ));
        }
        SweepError::ListGroups { .. } | SweepError::ListItems { .. } => {
            lines.push("   The failing group was not changed. Re-running will retry it.".to_string());
        }
    }
    lines
}

fn print_summary(summary: &SweepSummary) {
    let verb = if summary.dry_run { "Would combine" } else { "Combined" };

    for group in &summary.groups {
        for merge in &group.merges {
            println!(
                "  🔗 {} {} items named \"{}\" in group {} (total {})",
                verb,
                merge.archived.len() + 1,
                merge.name,
                group.group_id,
                merge.total
            );
        }
    }
    if summary.clusters_resolved() > 0 {
        println!();
    }

    println!(
        "📊 Board {}: {} groups, {} items scanned",
        summary.board_id,
        summary.groups.len(),
        summary.items_scanned()
    );
    if summary.dry_run {
        println!(
            "✅ Dry run complete: {} duplicate sets, {} items would be archived",
            summary.clusters_resolved(),
            summary.items_archived()
        );
    } else {
        println!(
            "✅ Done combining duplicates: {} duplicate sets merged, {} items archived",
            summary.clusters_resolved(),
            summary.items_archived()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardError, ItemId};

    #[test]
    fn test_archive_failure_guidance_lists_leftovers() {
        let error = SweepError::ArchiveDuplicate {
            group_id: GroupId::from("topics"),
            survivor: ItemId::from("1"),
            item_id: ItemId::from("3"),
            unarchived: vec![ItemId::from("3"), ItemId::from("4")],
            source: BoardError::Protocol("archive_item: item 3 was not archived".to_string()),
        };

        let guidance = failure_guidance(&error).join("\n");

        assert!(guidance.contains("Item 1 in group topics already holds the merged total"));
        assert!(guidance.contains("Archive these duplicates by hand before re-running"));
        assert!(guidance.contains("3, 4"));
        assert!(!guidance.contains("safe"));
    }

    #[test]
    fn test_listing_failure_guidance_allows_rerun() {
        let error = SweepError::ListItems {
            group_id: GroupId::from("topics"),
            source: BoardError::Protocol("no boards in response".to_string()),
        };

        let guidance = failure_guidance(&error).join("\n");

        assert!(guidance.contains("Re-running will retry it"));
        assert!(!guidance.contains("by hand"));
    }
}
