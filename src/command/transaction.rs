// Transaction records and the bounded transaction history

use crate::command::model::Command;
use crate::command::snapshot::StateSnapshot;
use crate::store::now_millis;
use std::collections::VecDeque;
use uuid::Uuid;

/// Lifecycle of a transaction; transitions are strictly linear
///
/// Pending -> Executing -> Committed | RolledBack | Failed.
/// `Failed` is reserved for a rollback that itself failed: store state
/// may be inconsistent and callers should treat it as unrecoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Executing,
    Committed,
    RolledBack,
    Failed,
}

/// An ordered batch of commands executed with all-or-nothing semantics
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub commands: Vec<Command>,
    pub status: TransactionStatus,
    /// Unix timestamp in milliseconds
    pub started_at: u64,
    pub completed_at: Option<u64>,
    pub error: Option<String>,
    /// Pre-transaction snapshot; consumed at terminal state (moved to
    /// the undo entry on commit, used for restore on failure), so
    /// history entries carry `None`
    pub snapshot: Option<StateSnapshot>,
}

impl Transaction {
    /// Create a pending transaction with a fresh id
    pub fn begin(commands: Vec<Command>) -> Self {
        Self {
            id: Uuid::new_v4(),
            commands,
            status: TransactionStatus::Pending,
            started_at: now_millis(),
            completed_at: None,
            error: None,
            snapshot: None,
        }
    }

    /// Move to a terminal state and stamp the completion time
    ///
    /// Drops the working snapshot: it either moved to an undo entry or
    /// was consumed by the rollback, and must not outlive the
    /// transaction in the history ring.
    pub fn complete(&mut self, status: TransactionStatus, error: Option<String>) {
        self.status = status;
        self.error = error;
        self.completed_at = Some(now_millis());
        self.snapshot = None;
    }
}

/// Bounded ring of finished transactions, kept for debug tooling
#[derive(Debug)]
pub struct TransactionHistory {
    entries: VecDeque<Transaction>,
    max_entries: usize,
}

impl TransactionHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Record a finished transaction, evicting the oldest past the cap
    pub fn record(&mut self, transaction: Transaction) {
        self.entries.push_back(transaction);
        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finished transactions, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// The most recently finished transaction
    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_pending() {
        let tx = Transaction::begin(vec![Command::clear_grid()]);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.completed_at.is_none());
    }

    #[test]
    fn test_complete_stamps_time() {
        let mut tx = Transaction::begin(Vec::new());
        tx.complete(TransactionStatus::Committed, None);
        assert_eq!(tx.status, TransactionStatus::Committed);
        assert!(tx.completed_at.is_some());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = TransactionHistory::new(2);
        for _ in 0..4 {
            let mut tx = Transaction::begin(Vec::new());
            tx.complete(TransactionStatus::Committed, None);
            history.record(tx);
        }
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_unique_ids() {
        let a = Transaction::begin(Vec::new());
        let b = Transaction::begin(Vec::new());
        assert_ne!(a.id, b.id);
    }
}
