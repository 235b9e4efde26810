// Result and error types for command execution

use crate::command::model::Command;
use crate::store::StoreError;
use uuid::Uuid;

/// Result type for internal execution paths
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised while dispatching a single command
///
/// Precondition violations are expected failure modes: they are reported
/// through ExecutionResult at the public surface, never as panics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    #[error("item '{0}' has already been placed")]
    ItemAlreadyUsed(String),

    #[error("positions {0} and {1} must differ")]
    IdenticalPositions(usize, usize),

    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The outcome every public entry point returns
///
/// Expected failures (invalid position, occupied slot, empty undo stack,
/// a rolled-back transaction) come back with `success == false` and a
/// human-readable `error`; callers branch on the value instead of
/// catching anything.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub error: Option<String>,
    /// Commands that ran to completion, in order. On rollback these are
    /// the commands whose effects were undone.
    pub executed_commands: Vec<Command>,
    /// Set when the result came from a transaction (including the
    /// implicit size-one transaction behind `execute`)
    pub transaction_id: Option<Uuid>,
}

impl ExecutionResult {
    /// A committed transaction
    pub fn committed(transaction_id: Uuid, executed_commands: Vec<Command>) -> Self {
        Self {
            success: true,
            error: None,
            executed_commands,
            transaction_id: Some(transaction_id),
        }
    }

    /// Success with nothing to do (empty batch, undo/redo bookkeeping)
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
            executed_commands: Vec::new(),
            transaction_id: None,
        }
    }

    /// A failure not tied to any transaction (empty undo stack,
    /// middleware rejection, reentrant call)
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            executed_commands: Vec::new(),
            transaction_id: None,
        }
    }

    /// A rolled-back or failed transaction
    pub fn transaction_failure(
        transaction_id: Uuid,
        error: impl Into<String>,
        executed_commands: Vec<Command>,
    ) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            executed_commands,
            transaction_id: Some(transaction_id),
        }
    }
}
