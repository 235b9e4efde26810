// Transient match-UI flags
//
// Keyboard mode, modal visibility and the quick-assign target live here.
// These flags are presentation state: they are excluded from transaction
// snapshots on purpose (rolling back a modal open/close would make the
// UI flicker for no data-integrity gain).

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchUiState {
    pub keyboard_mode: bool,
    pub show_comparison_modal: bool,
    pub show_result_share_modal: bool,
    /// Grid position armed for one-keystroke assignment
    pub quick_assign_position: Option<usize>,
}

#[derive(Debug, Default)]
pub struct MatchUiStore {
    state: MatchUiState,
}

impl MatchUiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MatchUiState {
        &self.state
    }

    pub fn set_keyboard_mode(&mut self, enabled: bool) {
        self.state.keyboard_mode = enabled;
        if !enabled {
            self.state.quick_assign_position = None;
        }
    }

    pub fn set_show_comparison_modal(&mut self, visible: bool) {
        self.state.show_comparison_modal = visible;
    }

    pub fn set_show_result_share_modal(&mut self, visible: bool) {
        self.state.show_result_share_modal = visible;
    }

    pub fn quick_assign_to_position(&mut self, position: Option<usize>) {
        self.state.quick_assign_position = position;
    }
}
