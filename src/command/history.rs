// Undo/redo stacks
//
// Two bounded stacks of snapshot-carrying entries. The undo stack holds
// pre-transaction snapshots of committed undoable transactions; the redo
// stack holds the state captured just before each undo was applied.
// Pushing new forward progress clears the redo stack: the undone
// timeline is gone once the user edits again.

use crate::command::model::Command;
use crate::command::snapshot::StateSnapshot;
use crate::store::now_millis;
use std::collections::VecDeque;

/// Default cap for each stack
pub const DEFAULT_MAX_STACK_SIZE: usize = 50;

/// One reversible step in the session history
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// First undoable command of the recorded transaction
    pub command: Command,
    /// Natural inverse of `command`, when one exists (audit only;
    /// restoration always goes through the snapshot)
    pub inverse: Option<Command>,
    /// State to restore when this entry is applied
    pub snapshot: StateSnapshot,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    pub description: String,
}

impl UndoEntry {
    pub fn new(command: Command, snapshot: StateSnapshot) -> Self {
        let description = command.description();
        let inverse = command.inverse();
        Self {
            command,
            inverse,
            snapshot,
            timestamp: now_millis(),
            description,
        }
    }
}

/// Bounded undo and redo stacks (most recent entry at the back)
#[derive(Debug)]
pub struct UndoHistory {
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: VecDeque<UndoEntry>,
    max_stack_size: usize,
}

impl UndoHistory {
    pub fn new(max_stack_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_stack_size),
            redo_stack: VecDeque::with_capacity(max_stack_size),
            max_stack_size,
        }
    }

    /// Record new forward progress
    ///
    /// Evicts the oldest undo entry past the cap and clears the redo
    /// stack (the undone timeline is no longer reachable).
    pub fn push(&mut self, entry: UndoEntry) {
        self.undo_stack.push_back(entry);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_stack_size {
            self.undo_stack.pop_front();
        }
    }

    /// Take the most recent undo entry
    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        self.undo_stack.pop_back()
    }

    /// Take the most recent redo entry
    pub fn pop_redo(&mut self) -> Option<UndoEntry> {
        self.redo_stack.pop_back()
    }

    /// Park an entry on the redo stack after an undo
    pub fn push_redo(&mut self, entry: UndoEntry) {
        self.redo_stack.push_back(entry);
        if self.redo_stack.len() > self.max_stack_size {
            self.redo_stack.pop_front();
        }
    }

    /// Put an entry back on the undo stack after a redo, without
    /// touching the redo stack
    pub fn restore_undo(&mut self, entry: UndoEntry) {
        self.undo_stack.push_back(entry);
        if self.undo_stack.len() > self.max_stack_size {
            self.undo_stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the entry `undo()` would apply
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|entry| entry.description.as_str())
    }

    /// Description of the entry `redo()` would apply
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|entry| entry.description.as_str())
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK_SIZE)
    }
}
