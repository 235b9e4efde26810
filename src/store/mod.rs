// State stores for a ranking session
//
// Each store is an independent mutable container with a narrow, named
// action contract. The orchestration core in `crate::command` never
// touches store internals directly: it reads state through `state()`,
// checks preconditions, and invokes exactly the actions listed here.
//
// Stores either succeed or return a StoreError; they never fail silently
// and never panic on bad input.

pub mod backlog;
pub mod comparison;
pub mod grid;
pub mod item;
pub mod match_ui;
pub mod notification;
pub mod registry;
pub mod session;

pub use backlog::BacklogStore;
pub use comparison::ComparisonStore;
pub use grid::GridStore;
pub use item::RankedItem;
pub use match_ui::MatchUiStore;
pub use notification::{Notification, NotificationCategory, NotificationLevel, NotificationStore};
pub use registry::StoreRegistry;
pub use session::{RankingSession, SessionStore};

/// Errors surfaced by store actions
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("position {position} is out of bounds for grid of size {size}")]
    PositionOutOfBounds { position: usize, size: usize },

    #[error("position {0} is already occupied")]
    PositionOccupied(usize),

    #[error("position {0} is empty")]
    PositionEmpty(usize),

    #[error("item '{0}' is not on the grid")]
    ItemNotOnGrid(String),

    #[error("item '{0}' is not in the backlog")]
    ItemNotInBacklog(String),

    #[error("no active session")]
    NoActiveSession,

    #[error("unknown session '{0}'")]
    UnknownSession(String),

    #[error("item '{0}' is not in the comparison set")]
    ItemNotInComparison(String),

    #[error("item '{0}' is already in the comparison set")]
    DuplicateComparisonItem(String),

    #[error("comparison set is full ({0} items max)")]
    ComparisonFull(usize),

    #[error("invalid grid state: {0} items for declared size {1}")]
    GridSizeMismatch(usize, usize),
}

/// Current Unix timestamp in milliseconds
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
