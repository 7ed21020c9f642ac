// In-memory board for testing - records every call, no network

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::board::types::*;
use crate::board::{BoardError, BoardOps};

/// A call received by [`MockBoard`], in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    ListGroups,
    ListItems(GroupId),
    UpdateNumericField(ItemId, f64),
    ArchiveItem(ItemId),
}

/// Board stand-in holding groups of items in board order
#[derive(Debug)]
pub struct MockBoard {
    board_id: BoardId,
    groups: Mutex<Vec<(GroupId, Vec<Item>)>>,
    calls: Mutex<Vec<BoardCall>>,
    failing_groups: Mutex<HashMap<GroupId, String>>,
    failing_items: Mutex<HashMap<ItemId, String>>,
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MockBoard {
    pub fn new(board_id: u64) -> Self {
        Self {
            board_id: BoardId(board_id),
            groups: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing_groups: Mutex::new(HashMap::new()),
            failing_items: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_group(self, group_id: &str, items: Vec<Item>) -> Self {
        self.groups
            .lock()
            .unwrap()
            .push((GroupId::from(group_id), items));
        self
    }

    /// Make `list_items` fail for a group
    pub fn fail_listing(&self, group_id: &str, message: &str) {
        self.failing_groups
            .lock()
            .unwrap()
            .insert(GroupId::from(group_id), message.to_string());
    }

    /// Make any write to an item fail
    pub fn fail_writes_to(&self, item_id: &str, message: &str) {
        self.failing_items
            .lock()
            .unwrap()
            .insert(ItemId::from(item_id), message.to_string());
    }

    pub fn calls(&self) -> Vec<BoardCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the write calls, in order
    pub fn writes(&self) -> Vec<BoardCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    BoardCall::UpdateNumericField(..) | BoardCall::ArchiveItem(_)
                )
            })
            .collect()
    }

    /// Current items of a group, after applied writes
    pub fn items(&self, group_id: &str) -> Vec<Item> {
        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id.0 == group_id)
            .map(|(_, items)| items.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: BoardCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_item(&self, item_id: &ItemId) -> Result<(), BoardError> {
        match self.failing_items.lock().unwrap().get(item_id) {
            Some(message) => Err(BoardError::Protocol(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BoardOps for MockBoard {
    fn board_id(&self) -> BoardId {
        self.board_id
    }

    async fn list_groups(&self) -> Result<Vec<GroupId>, BoardError> {
        self.record(BoardCall::ListGroups);
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn list_items(&self, group_id: &GroupId) -> Result<Vec<Item>, BoardError> {
        self.record(BoardCall::ListItems(group_id.clone()));
        if let Some(message) = self.failing_groups.lock().unwrap().get(group_id) {
            return Err(BoardError::Protocol(message.clone()));
        }

        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == group_id)
            .map(|(_, items)| items.clone())
            .ok_or_else(|| BoardError::Protocol(format!("group {group_id} not found on board")))
    }

    async fn update_numeric_field(&self, item_id: &ItemId, value: f64) -> Result<(), BoardError> {
        self.record(BoardCall::UpdateNumericField(item_id.clone(), value));
        self.check_item(item_id)?;

        for (_, items) in self.groups.lock().unwrap().iter_mut() {
            if let Some(item) = items.iter_mut().find(|item| &item.id == item_id) {
                item.value = NumericValue::Present(value);
                return Ok(());
            }
        }
        Err(BoardError::Protocol(format!("item {item_id} not found")))
    }

    async fn archive_item(&self, item_id: &ItemId) -> Result<(), BoardError> {
        self.record(BoardCall::ArchiveItem(item_id.clone()));
        self.check_item(item_id)?;

        for (_, items) in self.groups.lock().unwrap().iter_mut() {
            if let Some(index) = items.iter().position(|item| &item.id == item_id) {
                items.remove(index);
                return Ok(());
            }
        }
        Err(BoardError::Protocol(format!("item {item_id} not found")))
    }
}
