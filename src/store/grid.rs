// Position grid store
//
// The grid is a fixed-size array of ranking slots. Slot 0 is the top
// rank. The store owns occupancy rules; range checks are shared with the
// executor's preconditions so a failed check never mutates anything.

use crate::store::StoreError;
use crate::store::item::RankedItem;
use serde::{Deserialize, Serialize};

/// Snapshot-able grid state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    /// One slot per rank position; `None` means the slot is empty
    pub items: Vec<Option<RankedItem>>,
    /// Declared grid size; always equals `items.len()`
    pub size: usize,
    /// List this grid is ranking, once initialized
    pub list_id: Option<String>,
    /// Category label for the list (e.g. "films", "albums")
    pub category: Option<String>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            size: 0,
            list_id: None,
            category: None,
        }
    }
}

/// Mutable grid container
#[derive(Debug, Default)]
pub struct GridStore {
    state: GridState,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Set up an empty grid of `size` slots for a list
    pub fn initialize_grid(&mut self, size: usize, list_id: String, category: String) {
        self.state = GridState {
            items: vec![None; size],
            size,
            list_id: Some(list_id),
            category: Some(category),
        };
    }

    /// Place an item into an empty slot
    pub fn assign_item_to_grid(
        &mut self,
        item: RankedItem,
        position: usize,
    ) -> Result<(), StoreError> {
        self.check_bounds(position)?;
        if self.state.items[position].is_some() {
            return Err(StoreError::PositionOccupied(position));
        }
        self.state.items[position] = Some(item);
        Ok(())
    }

    /// Move an item between slots
    ///
    /// If the destination is occupied the two items exchange positions
    /// (a drag onto an occupied slot reads as a swap, not an overwrite).
    pub fn move_grid_item(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if self.state.items[from].is_none() {
            return Err(StoreError::PositionEmpty(from));
        }
        self.state.items.swap(from, to);
        Ok(())
    }

    /// Exchange the contents of two slots (either may be empty)
    pub fn swap_items(&mut self, a: usize, b: usize) -> Result<(), StoreError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        self.state.items.swap(a, b);
        Ok(())
    }

    /// Remove and return the item at a position
    pub fn remove_item_from_grid(&mut self, position: usize) -> Result<RankedItem, StoreError> {
        self.check_bounds(position)?;
        self.state.items[position]
            .take()
            .ok_or(StoreError::PositionEmpty(position))
    }

    /// Remove and return an item by its id, wherever it sits
    pub fn remove_item_by_item_id(&mut self, item_id: &str) -> Result<RankedItem, StoreError> {
        let slot = self
            .state
            .items
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.id == item_id))
            .ok_or_else(|| StoreError::ItemNotOnGrid(item_id.to_string()))?;
        self.state.items[slot]
            .take()
            .ok_or_else(|| StoreError::ItemNotOnGrid(item_id.to_string()))
    }

    /// Empty every slot, keeping size and list identity
    pub fn clear_grid(&mut self) {
        for slot in &mut self.state.items {
            *slot = None;
        }
    }

    /// Replace the grid contents from a saved session
    pub fn load_from_session(
        &mut self,
        items: Vec<Option<RankedItem>>,
        size: usize,
    ) -> Result<(), StoreError> {
        if items.len() != size {
            return Err(StoreError::GridSizeMismatch(items.len(), size));
        }
        self.state.items = items;
        self.state.size = size;
        Ok(())
    }

    /// Restore a previously captured state wholesale
    pub fn restore(&mut self, state: GridState) -> Result<(), StoreError> {
        if state.items.len() != state.size {
            return Err(StoreError::GridSizeMismatch(state.items.len(), state.size));
        }
        self.state = state;
        Ok(())
    }

    /// Item at a position, if any
    pub fn item_at(&self, position: usize) -> Option<&RankedItem> {
        self.state.items.get(position).and_then(|slot| slot.as_ref())
    }

    /// True when `position` addresses a real slot
    pub fn in_bounds(&self, position: usize) -> bool {
        position < self.state.size
    }

    /// Ids of every item currently placed
    pub fn placed_ids(&self) -> Vec<String> {
        self.state
            .items
            .iter()
            .flatten()
            .map(|item| item.id.clone())
            .collect()
    }

    fn check_bounds(&self, position: usize) -> Result<(), StoreError> {
        if position < self.state.size {
            Ok(())
        } else {
            Err(StoreError::PositionOutOfBounds {
                position,
                size: self.state.size,
            })
        }
    }
}
