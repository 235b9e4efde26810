// Backlog of unplaced items
//
// The backlog lists every item available for the current list and
// whether it has been placed on the grid. Grid commands keep the used
// marks consistent as a paired update, so the backlog participates in
// transaction snapshots.

use crate::store::StoreError;
use crate::store::item::{BacklogEntry, RankedItem};
use serde::{Deserialize, Serialize};

/// Snapshot-able backlog state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogState {
    pub entries: Vec<BacklogEntry>,
}

#[derive(Debug, Default)]
pub struct BacklogStore {
    state: BacklogState,
}

impl BacklogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BacklogState {
        &self.state
    }

    /// Replace the backlog contents (all entries start unused)
    pub fn set_items(&mut self, items: Vec<RankedItem>) {
        self.state.entries = items.into_iter().map(BacklogEntry::new).collect();
    }

    /// Flag an item as placed (or unplaced) on the grid
    pub fn mark_item_as_used(&mut self, item_id: &str, used: bool) -> Result<(), StoreError> {
        let entry = self
            .state
            .entries
            .iter_mut()
            .find(|entry| entry.item.id == item_id)
            .ok_or_else(|| StoreError::ItemNotInBacklog(item_id.to_string()))?;
        entry.used = used;
        Ok(())
    }

    /// Reset every used mark, then set marks for the given placed ids
    pub fn sync_used_marks(&mut self, placed_ids: &[String]) {
        for entry in &mut self.state.entries {
            entry.used = placed_ids.contains(&entry.item.id);
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.state.entries.iter().any(|entry| entry.item.id == item_id)
    }

    pub fn is_used(&self, item_id: &str) -> bool {
        self.state
            .entries
            .iter()
            .any(|entry| entry.item.id == item_id && entry.used)
    }

    /// Entries not yet placed on the grid
    pub fn unused_entries(&self) -> impl Iterator<Item = &BacklogEntry> {
        self.state.entries.iter().filter(|entry| !entry.used)
    }

    /// Restore a previously captured state wholesale
    pub fn restore(&mut self, state: BacklogState) {
        self.state = state;
    }
}
