// Session registry store
//
// One RankingSession per list the user has worked on. The active session
// tracks which list the grid currently represents; saving copies the
// grid placements into the registry so switching lists round-trips.

use crate::store::StoreError;
use crate::store::grid::GridState;
use crate::store::item::RankedItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A saved ranking session for one list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSession {
    pub list_id: String,
    pub category: String,
    /// Saved grid slots, same layout as `GridState::items`
    pub placements: Vec<Option<RankedItem>>,
    pub grid_size: usize,
    /// Set on the first save; `None` for sessions never saved
    pub saved_at: Option<DateTime<Utc>>,
}

/// Snapshot-able session registry state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// All known sessions, keyed by list id
    pub sessions: HashMap<String, RankingSession>,
    /// List id of the session the grid currently represents
    pub active_list_id: Option<String>,
    /// Backlog item highlighted for keyboard-driven placement
    pub selected_backlog_item: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Register (or refresh) a session for a list and make it active
    pub fn sync_with_list(&mut self, list_id: String, category: String, grid_size: usize) {
        self.state
            .sessions
            .entry(list_id.clone())
            .or_insert_with(|| RankingSession {
                list_id: list_id.clone(),
                category: category.clone(),
                placements: vec![None; grid_size],
                grid_size,
                saved_at: None,
            });
        self.state.active_list_id = Some(list_id);
    }

    /// The session the grid currently represents, if any
    pub fn active_session(&self) -> Option<&RankingSession> {
        self.state
            .active_list_id
            .as_ref()
            .and_then(|id| self.state.sessions.get(id))
    }

    /// Copy the current grid placements into the active session
    pub fn save_current_session(&mut self, grid: &GridState) -> Result<(), StoreError> {
        let list_id = self
            .state
            .active_list_id
            .clone()
            .ok_or(StoreError::NoActiveSession)?;
        let session = self
            .state
            .sessions
            .get_mut(&list_id)
            .ok_or(StoreError::UnknownSession(list_id))?;
        session.placements = grid.items.clone();
        session.grid_size = grid.size;
        session.saved_at = Some(Utc::now());
        Ok(())
    }

    /// Make another list's session active and return it for grid reload
    pub fn switch_to_session(&mut self, list_id: &str) -> Result<&RankingSession, StoreError> {
        if !self.state.sessions.contains_key(list_id) {
            return Err(StoreError::UnknownSession(list_id.to_string()));
        }
        self.state.active_list_id = Some(list_id.to_string());
        self.state.selected_backlog_item = None;
        Ok(&self.state.sessions[list_id])
    }

    /// Highlight a backlog item for keyboard placement (`None` clears)
    pub fn set_selected_backlog_item(&mut self, item_id: Option<String>) {
        self.state.selected_backlog_item = item_id;
    }

    /// Restore a previously captured state wholesale
    pub fn restore(&mut self, state: SessionState) {
        self.state = state;
    }
}
