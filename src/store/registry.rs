// StoreRegistry - bundles the six stores behind one handle
//
// The orchestrator takes a registry by value at construction instead of
// resolving stores through globals; tests hand it a registry built from
// fakes or fresh stores and the dependency graph stays acyclic.

use crate::store::backlog::BacklogStore;
use crate::store::comparison::ComparisonStore;
use crate::store::grid::GridStore;
use crate::store::match_ui::MatchUiStore;
use crate::store::notification::NotificationStore;
use crate::store::session::SessionStore;

/// All mutable session state, one field per store family
#[derive(Debug, Default)]
pub struct StoreRegistry {
    pub grid: GridStore,
    pub sessions: SessionStore,
    pub comparison: ComparisonStore,
    pub match_ui: MatchUiStore,
    pub backlog: BacklogStore,
    pub notifications: NotificationStore,
}

impl StoreRegistry {
    /// Create a registry of empty stores
    pub fn new() -> Self {
        Self::default()
    }
}
