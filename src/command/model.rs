// Command value objects and factory constructors
//
// A Command is an immutable description of one intended mutation. It
// carries no behavior: the executor owns dispatch, the factories here
// own defaults (timestamp, correlation id, undoability per family).

use crate::store::item::RankedItem;
use crate::store::now_millis;
use uuid::Uuid;

/// The closed set of mutations the orchestrator understands
///
/// Four families: grid placements, session lifecycle, comparison set,
/// and transient UI flags. Each variant carries exactly the payload its
/// store action needs; the executor matches exhaustively, so adding a
/// variant without a handler is a compile error.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    // Grid mutations
    AssignItem { item: RankedItem, position: usize },
    MoveItem { from: usize, to: usize },
    SwapItems { a: usize, b: usize },
    RemoveItem { position: usize },
    RemoveItemById { item_id: String },
    ClearGrid,

    // Session mutations
    InitializeSession { list_id: String, category: String, grid_size: usize },
    ResetSession,
    SaveSession,
    SwitchSession { list_id: String },

    // Comparison mutations
    OpenComparison,
    CloseComparison,
    AddToComparison { item: RankedItem },
    RemoveFromComparison { item_id: String },
    ClearComparison,

    // Transient UI mutations
    SetKeyboardMode(bool),
    QuickAssign { position: Option<usize> },
    ShowResultModal,
    HideResultModal,
}

/// Command family, used for logging and snapshot scoping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFamily {
    Grid,
    Session,
    Comparison,
    Ui,
}

/// Metadata attached to every command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMeta {
    /// Where the command came from (e.g. "drag-drop", "keyboard")
    pub source: Option<String>,
    /// Correlates a command across logs and events
    pub correlation_id: Uuid,
    /// Whether a committed transaction containing this command is
    /// recorded on the undo stack
    pub undoable: bool,
}

/// An immutable description of one intended state mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    /// Unix timestamp in milliseconds at construction
    pub timestamp: u64,
    pub meta: CommandMeta,
}

impl Command {
    fn with_kind(kind: CommandKind) -> Self {
        let undoable = match kind.family() {
            CommandFamily::Grid | CommandFamily::Comparison => true,
            // Reset destroys placement data, so it stays reversible
            // even though the rest of the session family is not.
            CommandFamily::Session => matches!(kind, CommandKind::ResetSession),
            CommandFamily::Ui => false,
        };
        Self {
            kind,
            timestamp: now_millis(),
            meta: CommandMeta {
                source: None,
                correlation_id: Uuid::new_v4(),
                undoable,
            },
        }
    }

    /// Attach an origin label (e.g. "drag-drop") to the metadata
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    // Grid factories

    pub fn assign(item: RankedItem, position: usize) -> Self {
        Self::with_kind(CommandKind::AssignItem { item, position })
    }

    pub fn move_item(from: usize, to: usize) -> Self {
        Self::with_kind(CommandKind::MoveItem { from, to })
    }

    pub fn swap(a: usize, b: usize) -> Self {
        Self::with_kind(CommandKind::SwapItems { a, b })
    }

    pub fn remove(position: usize) -> Self {
        Self::with_kind(CommandKind::RemoveItem { position })
    }

    pub fn remove_by_id(item_id: impl Into<String>) -> Self {
        Self::with_kind(CommandKind::RemoveItemById {
            item_id: item_id.into(),
        })
    }

    pub fn clear_grid() -> Self {
        Self::with_kind(CommandKind::ClearGrid)
    }

    // Session factories

    pub fn initialize_session(
        list_id: impl Into<String>,
        category: impl Into<String>,
        grid_size: usize,
    ) -> Self {
        Self::with_kind(CommandKind::InitializeSession {
            list_id: list_id.into(),
            category: category.into(),
            grid_size,
        })
    }

    pub fn reset_session() -> Self {
        Self::with_kind(CommandKind::ResetSession)
    }

    pub fn save_session() -> Self {
        Self::with_kind(CommandKind::SaveSession)
    }

    pub fn switch_session(list_id: impl Into<String>) -> Self {
        Self::with_kind(CommandKind::SwitchSession {
            list_id: list_id.into(),
        })
    }

    // Comparison factories

    pub fn open_comparison() -> Self {
        Self::with_kind(CommandKind::OpenComparison)
    }

    pub fn close_comparison() -> Self {
        Self::with_kind(CommandKind::CloseComparison)
    }

    pub fn add_to_comparison(item: RankedItem) -> Self {
        Self::with_kind(CommandKind::AddToComparison { item })
    }

    pub fn remove_from_comparison(item_id: impl Into<String>) -> Self {
        Self::with_kind(CommandKind::RemoveFromComparison {
            item_id: item_id.into(),
        })
    }

    pub fn clear_comparison() -> Self {
        Self::with_kind(CommandKind::ClearComparison)
    }

    // UI factories

    pub fn set_keyboard_mode(enabled: bool) -> Self {
        Self::with_kind(CommandKind::SetKeyboardMode(enabled))
    }

    pub fn quick_assign(position: Option<usize>) -> Self {
        Self::with_kind(CommandKind::QuickAssign { position })
    }

    pub fn show_result_modal() -> Self {
        Self::with_kind(CommandKind::ShowResultModal)
    }

    pub fn hide_result_modal() -> Self {
        Self::with_kind(CommandKind::HideResultModal)
    }

    /// Human-readable summary, used for undo descriptions and log lines
    pub fn description(&self) -> String {
        match &self.kind {
            CommandKind::AssignItem { item, position } => {
                format!("Assign '{}' to position {}", item.title, position)
            }
            CommandKind::MoveItem { from, to } => format!("Move item from {from} to {to}"),
            CommandKind::SwapItems { a, b } => format!("Swap positions {a} and {b}"),
            CommandKind::RemoveItem { position } => format!("Remove item at position {position}"),
            CommandKind::RemoveItemById { item_id } => format!("Remove item '{item_id}'"),
            CommandKind::ClearGrid => "Clear the grid".to_string(),
            CommandKind::InitializeSession { list_id, grid_size, .. } => {
                format!("Initialize session for '{list_id}' ({grid_size} slots)")
            }
            CommandKind::ResetSession => "Reset session".to_string(),
            CommandKind::SaveSession => "Save session".to_string(),
            CommandKind::SwitchSession { list_id } => format!("Switch to session '{list_id}'"),
            CommandKind::OpenComparison => "Open comparison".to_string(),
            CommandKind::CloseComparison => "Close comparison".to_string(),
            CommandKind::AddToComparison { item } => {
                format!("Compare '{}'", item.title)
            }
            CommandKind::RemoveFromComparison { item_id } => {
                format!("Stop comparing '{item_id}'")
            }
            CommandKind::ClearComparison => "Clear comparison".to_string(),
            CommandKind::SetKeyboardMode(enabled) => {
                format!("Keyboard mode {}", if *enabled { "on" } else { "off" })
            }
            CommandKind::QuickAssign { position: Some(p) } => format!("Quick-assign to {p}"),
            CommandKind::QuickAssign { position: None } => "Clear quick-assign".to_string(),
            CommandKind::ShowResultModal => "Show result modal".to_string(),
            CommandKind::HideResultModal => "Hide result modal".to_string(),
        }
    }

    /// The natural inverse, where one exists
    ///
    /// Restoration is snapshot-based; the inverse is kept on undo
    /// entries for audit output only.
    pub fn inverse(&self) -> Option<Command> {
        match &self.kind {
            CommandKind::AssignItem { item, .. } => Some(Command::remove_by_id(item.id.clone())),
            CommandKind::MoveItem { from, to } => Some(Command::move_item(*to, *from)),
            CommandKind::SwapItems { a, b } => Some(Command::swap(*a, *b)),
            CommandKind::AddToComparison { item } => {
                Some(Command::remove_from_comparison(item.id.clone()))
            }
            _ => None,
        }
    }
}

impl CommandKind {
    /// Which of the four families this command belongs to
    pub fn family(&self) -> CommandFamily {
        match self {
            CommandKind::AssignItem { .. }
            | CommandKind::MoveItem { .. }
            | CommandKind::SwapItems { .. }
            | CommandKind::RemoveItem { .. }
            | CommandKind::RemoveItemById { .. }
            | CommandKind::ClearGrid => CommandFamily::Grid,
            CommandKind::InitializeSession { .. }
            | CommandKind::ResetSession
            | CommandKind::SaveSession
            | CommandKind::SwitchSession { .. } => CommandFamily::Session,
            CommandKind::OpenComparison
            | CommandKind::CloseComparison
            | CommandKind::AddToComparison { .. }
            | CommandKind::RemoveFromComparison { .. }
            | CommandKind::ClearComparison => CommandFamily::Comparison,
            CommandKind::SetKeyboardMode(_)
            | CommandKind::QuickAssign { .. }
            | CommandKind::ShowResultModal
            | CommandKind::HideResultModal => CommandFamily::Ui,
        }
    }
}
