//! Duplicate grouping and reconciliation.
//!
//! Items of one group are partitioned by exact name. Every partition with more
//! than one member becomes a merge: the first item in fetch order survives and
//! receives the sum of all members' values, the rest are archived.

use serde::Serialize;
use std::collections::HashMap;

use crate::board::{Item, ItemId};

/// A write the sweep has to perform on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    UpdateSurvivor { item_id: ItemId, value: f64 },
    ArchiveDuplicate { item_id: ItemId },
}

/// Items sharing one name within a group, in fetch order
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCluster {
    pub name: String,
    pub survivor: Item,
    pub duplicates: Vec<Item>,
}

impl DuplicateCluster {
    fn new(first: Item) -> Self {
        Self {
            name: first.name.clone(),
            survivor: first,
            duplicates: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        1 + self.duplicates.len()
    }

    pub fn is_duplicate(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Sum of every member's value, survivor included, in fetch order
    pub fn total(&self) -> f64 {
        self.members().fold(0.0, |sum, item| sum + item.value.amount())
    }

    pub fn members(&self) -> impl Iterator<Item = &Item> {
        std::iter::once(&self.survivor).chain(self.duplicates.iter())
    }

    /// Survivor update first, then one archive per duplicate. Empty for singletons.
    pub fn actions(&self) -> Vec<Action> {
        if !self.is_duplicate() {
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(self.len());
        actions.push(Action::UpdateSurvivor {
            item_id: self.survivor.id.clone(),
            value: self.total(),
        });
        actions.extend(self.duplicates.iter().map(|item| Action::ArchiveDuplicate {
            item_id: item.id.clone(),
        }));
        actions
    }
}

/// Partition items by exact name, keeping the order in which names first appear
pub fn partition_by_name(items: &[Item]) -> Vec<DuplicateCluster> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut clusters: Vec<DuplicateCluster> = Vec::new();

    for item in items {
        match index.get(item.name.as_str()) {
            Some(&position) => clusters[position].duplicates.push(item.clone()),
            None => {
                index.insert(item.name.as_str(), clusters.len());
                clusters.push(DuplicateCluster::new(item.clone()));
            }
        }
    }

    clusters
}

/// Clusters that need merging
pub fn find_duplicates(items: &[Item]) -> Vec<DuplicateCluster> {
    partition_by_name(items)
        .into_iter()
        .filter(DuplicateCluster::is_duplicate)
        .collect()
}

pub fn reconcile(items: &[Item]) -> Vec<Action> {
    find_duplicates(items)
        .iter()
        .flat_map(DuplicateCluster::actions)
        .collect()
}
