// Side-by-side comparison store
//
// Holds the small set of items the user is comparing before placing
// them. The set is capped: the comparison view renders at most
// MAX_COMPARISON_ITEMS side by side.

use crate::store::StoreError;
use crate::store::item::RankedItem;
use serde::{Deserialize, Serialize};

/// Default upper bound on items compared at once
pub const MAX_COMPARISON_ITEMS: usize = 4;

/// Snapshot-able comparison state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonState {
    pub open: bool,
    pub items: Vec<RankedItem>,
}

#[derive(Debug)]
pub struct ComparisonStore {
    state: ComparisonState,
    /// How many items fit side by side; tunable per host layout
    capacity: usize,
}

impl Default for ComparisonStore {
    fn default() -> Self {
        Self::with_capacity(MAX_COMPARISON_ITEMS)
    }
}

impl ComparisonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: ComparisonState::default(),
            capacity,
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn state(&self) -> &ComparisonState {
        &self.state
    }

    pub fn open_comparison(&mut self) {
        self.state.open = true;
    }

    pub fn close_comparison(&mut self) {
        self.state.open = false;
    }

    /// Add an item to the comparison set
    pub fn add_to_comparison(&mut self, item: RankedItem) -> Result<(), StoreError> {
        if self.state.items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::DuplicateComparisonItem(item.id));
        }
        if self.state.items.len() >= self.capacity {
            return Err(StoreError::ComparisonFull(self.capacity));
        }
        self.state.items.push(item);
        Ok(())
    }

    /// Remove an item from the comparison set by id
    pub fn remove_from_comparison(&mut self, item_id: &str) -> Result<RankedItem, StoreError> {
        let index = self
            .state
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| StoreError::ItemNotInComparison(item_id.to_string()))?;
        Ok(self.state.items.remove(index))
    }

    pub fn clear_comparison(&mut self) {
        self.state.items.clear();
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.state.items.iter().any(|item| item.id == item_id)
    }

    /// Restore a previously captured state wholesale
    pub fn restore(&mut self, state: ComparisonState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let mut store = ComparisonStore::new();
        store.add_to_comparison(RankedItem::new("a", "A")).unwrap();
        assert!(matches!(
            store.add_to_comparison(RankedItem::new("a", "A again")),
            Err(StoreError::DuplicateComparisonItem(_))
        ));
    }

    #[test]
    fn test_default_cap_enforced() {
        let mut store = ComparisonStore::new();
        for i in 0..MAX_COMPARISON_ITEMS {
            store
                .add_to_comparison(RankedItem::new(format!("item-{i}"), format!("Item {i}")))
                .unwrap();
        }
        assert!(matches!(
            store.add_to_comparison(RankedItem::new("extra", "Extra")),
            Err(StoreError::ComparisonFull(_))
        ));
    }

    #[test]
    fn test_custom_capacity() {
        let mut store = ComparisonStore::with_capacity(2);
        store.add_to_comparison(RankedItem::new("a", "A")).unwrap();
        store.add_to_comparison(RankedItem::new("b", "B")).unwrap();
        assert!(matches!(
            store.add_to_comparison(RankedItem::new("c", "C")),
            Err(StoreError::ComparisonFull(2))
        ));

        store.set_capacity(3);
        assert_eq!(store.capacity(), 3);
        store.add_to_comparison(RankedItem::new("c", "C")).unwrap();
    }
}
