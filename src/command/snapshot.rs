// State snapshots for rollback and undo
//
// A snapshot is a full-value copy of the store families that
// participate in atomicity: grid, session, comparison, and backlog.
// The backlog is included because grid commands pair with its used
// marks; match-UI flags and notifications are transient presentation
// state and stay outside rollback.

use crate::store::StoreRegistry;
use crate::store::backlog::BacklogState;
use crate::store::comparison::ComparisonState;
use crate::store::grid::GridState;
use crate::store::now_millis;
use crate::store::session::SessionState;

/// Point-in-time copy of restorable store state
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub grid: GridState,
    pub sessions: SessionState,
    pub comparison: ComparisonState,
    pub backlog: BacklogState,
    /// Unix timestamp in milliseconds at capture
    pub captured_at: u64,
}

impl StateSnapshot {
    /// Copy the restorable state out of the stores
    pub fn capture(stores: &StoreRegistry) -> Self {
        Self {
            grid: stores.grid.state().clone(),
            sessions: stores.sessions.state().clone(),
            comparison: stores.comparison.state().clone(),
            backlog: stores.backlog.state().clone(),
            captured_at: now_millis(),
        }
    }

    /// Write the captured state back into the stores
    ///
    /// # Errors
    /// Fails only on an internally inconsistent snapshot (grid length
    /// not matching its declared size); the caller marks the owning
    /// transaction `Failed` in that case, since store state may then be
    /// partially restored.
    pub fn restore(&self, stores: &mut StoreRegistry) -> Result<(), crate::store::StoreError> {
        stores.grid.restore(self.grid.clone())?;
        stores.sessions.restore(self.sessions.clone());
        stores.comparison.restore(self.comparison.clone());
        stores.backlog.restore(self.backlog.clone());
        Ok(())
    }

    /// True when the captured stores match the snapshot exactly
    pub fn matches(&self, stores: &StoreRegistry) -> bool {
        self.grid == *stores.grid.state()
            && self.sessions == *stores.sessions.state()
            && self.comparison == *stores.comparison.state()
            && self.backlog == *stores.backlog.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::item::RankedItem;

    #[test]
    fn test_capture_restore_round_trip() {
        let mut stores = StoreRegistry::new();
        stores.grid.initialize_grid(3, "list-1".into(), "films".into());
        stores.backlog.set_items(vec![RankedItem::new("a", "A")]);

        let snapshot = StateSnapshot::capture(&stores);

        stores
            .grid
            .assign_item_to_grid(RankedItem::new("a", "A"), 0)
            .unwrap();
        stores.backlog.mark_item_as_used("a", true).unwrap();
        assert!(!snapshot.matches(&stores));

        snapshot.restore(&mut stores).unwrap();
        assert!(snapshot.matches(&stores));
        assert!(stores.grid.item_at(0).is_none());
        assert!(!stores.backlog.is_used("a"));
    }

    #[test]
    fn test_restore_rejects_corrupt_snapshot() {
        let mut stores = StoreRegistry::new();
        stores.grid.initialize_grid(3, "list-1".into(), "films".into());

        let mut snapshot = StateSnapshot::capture(&stores);
        snapshot.grid.size = 99;

        assert!(snapshot.restore(&mut stores).is_err());
    }
}
