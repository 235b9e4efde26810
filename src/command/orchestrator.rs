// Orchestrator - public entry points for commands, transactions and
// history
//
// Single-threaded and synchronous: every command, transaction and store
// mutation runs to completion on the calling thread. The orchestrator
// owns the StoreRegistry for the lifetime of the session and is the
// sole writer-of-record for the mutation sequence.

use crate::command::events::{EventBus, OrchestratorEvent, SubscriptionId};
use crate::command::executor;
use crate::command::history::{UndoEntry, UndoHistory};
use crate::command::middleware::{Middleware, MiddlewarePipeline};
use crate::command::model::Command;
use crate::command::result::ExecutionResult;
use crate::command::snapshot::StateSnapshot;
use crate::command::transaction::{Transaction, TransactionHistory, TransactionStatus};
use crate::store::notification::{Notification, NotificationCategory};
use crate::store::{StoreRegistry, now_millis};
use tracing::{debug, error, warn};

/// Tunables for history retention and store limits
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Cap on each of the undo and redo stacks
    pub max_undo_depth: usize,
    /// Cap on the finished-transaction ring kept for debugging
    pub max_transaction_history: usize,
    /// How many items the comparison set accepts at once
    pub max_comparison_items: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: crate::command::history::DEFAULT_MAX_STACK_SIZE,
            max_transaction_history: 100,
            max_comparison_items: crate::store::comparison::MAX_COMPARISON_ITEMS,
        }
    }
}

/// Read-only introspection for developer tooling
///
/// Never consulted by the commit/rollback algorithm itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugSnapshot {
    pub executing: bool,
    pub transactions_recorded: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub middleware_count: usize,
    pub subscriber_count: usize,
}

/// The transactional command orchestrator
///
/// Callers build commands via the `Command` factories and hand them to
/// `execute` (one command, wrapped by the middleware pipeline) or
/// `transaction` (an atomic batch). Expected failures come back inside
/// the `ExecutionResult`; these entry points never panic on user input.
pub struct Orchestrator {
    stores: StoreRegistry,
    pipeline: MiddlewarePipeline,
    undo_history: UndoHistory,
    transactions: TransactionHistory,
    events: EventBus,
    executing: bool,
}

impl Orchestrator {
    /// Create an orchestrator over the given stores with defaults
    pub fn new(stores: StoreRegistry) -> Self {
        Self::with_config(stores, OrchestratorConfig::default())
    }

    pub fn with_config(mut stores: StoreRegistry, config: OrchestratorConfig) -> Self {
        stores.comparison.set_capacity(config.max_comparison_items);
        Self {
            stores,
            pipeline: MiddlewarePipeline::new(),
            undo_history: UndoHistory::new(config.max_undo_depth),
            transactions: TransactionHistory::new(config.max_transaction_history),
            events: EventBus::new(),
            executing: false,
        }
    }

    /// Read access to the stores (state queries, assertions)
    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    /// Direct store access for session setup (seeding the backlog,
    /// dismissing notifications); command dispatch is the only path
    /// that should mutate placement state
    pub fn stores_mut(&mut self) -> &mut StoreRegistry {
        &mut self.stores
    }

    /// Register a middleware on the top-level dispatch pipeline
    pub fn register_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.pipeline.register(middleware);
    }

    pub fn remove_middleware(&mut self, name: &str) -> bool {
        self.pipeline.remove(name)
    }

    pub fn set_middleware_enabled(&mut self, name: &str, enabled: bool) -> bool {
        self.pipeline.set_enabled(name, enabled)
    }

    /// Subscribe to lifecycle events; keep the id to unsubscribe
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&OrchestratorEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Execute one command through the middleware pipeline
    ///
    /// Internally a transaction of size one, so atomicity and undo
    /// recording behave exactly as they do for batches.
    pub fn execute(&mut self, command: Command) -> ExecutionResult {
        let Self {
            stores,
            pipeline,
            undo_history,
            transactions,
            events,
            executing,
        } = self;
        pipeline.run(&command, &mut |cmd: &Command| {
            run_transaction(
                stores,
                undo_history,
                transactions,
                events,
                executing,
                vec![cmd.clone()],
            )
        })
    }

    /// Execute an ordered batch of commands atomically
    ///
    /// Commands run strictly in list order against the raw executor
    /// (the middleware pipeline is not applied per command: logging and
    /// persistence side effects belong to the batch, not to each step).
    /// The first failure stops execution and rolls every store back to
    /// the pre-transaction snapshot.
    pub fn transaction(&mut self, commands: Vec<Command>) -> ExecutionResult {
        let Self {
            stores,
            undo_history,
            transactions,
            events,
            executing,
            ..
        } = self;
        run_transaction(stores, undo_history, transactions, events, executing, commands)
    }

    /// Restore the state recorded before the most recent undoable
    /// transaction
    pub fn undo(&mut self) -> ExecutionResult {
        let Some(entry) = self.undo_history.pop_undo() else {
            return ExecutionResult::failure("Nothing to undo");
        };

        // Capture where we are now so redo can come back here
        let current = StateSnapshot::capture(&self.stores);
        if let Err(err) = entry.snapshot.restore(&mut self.stores) {
            error!(%err, "undo restore failed; entry dropped");
            return ExecutionResult::failure(format!("undo failed: {err}"));
        }

        let description = entry.description.clone();
        self.undo_history.push_redo(UndoEntry {
            snapshot: current,
            timestamp: now_millis(),
            ..entry
        });
        debug!(description = %description, "undo applied");
        self.events.emit(&OrchestratorEvent::UndoApplied { description });
        ExecutionResult::success()
    }

    /// Re-apply the most recently undone transaction
    pub fn redo(&mut self) -> ExecutionResult {
        let Some(entry) = self.undo_history.pop_redo() else {
            return ExecutionResult::failure("Nothing to redo");
        };

        let current = StateSnapshot::capture(&self.stores);
        if let Err(err) = entry.snapshot.restore(&mut self.stores) {
            error!(%err, "redo restore failed; entry dropped");
            return ExecutionResult::failure(format!("redo failed: {err}"));
        }

        let description = entry.description.clone();
        self.undo_history.restore_undo(UndoEntry {
            snapshot: current,
            timestamp: now_millis(),
            ..entry
        });
        debug!(description = %description, "redo applied");
        self.events.emit(&OrchestratorEvent::RedoApplied { description });
        ExecutionResult::success()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_history.can_redo()
    }

    /// Description of what `undo()` would revert
    pub fn undo_description(&self) -> Option<String> {
        self.undo_history.undo_description().map(str::to_string)
    }

    /// Description of what `redo()` would re-apply
    pub fn redo_description(&self) -> Option<String> {
        self.undo_history.redo_description().map(str::to_string)
    }

    /// Drop all undo/redo history (e.g. when switching lists)
    pub fn clear_history(&mut self) {
        self.undo_history.clear();
    }

    /// Finished transactions, oldest first
    pub fn transaction_history(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.entries()
    }

    /// Snapshot of orchestrator internals for developer tooling
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            executing: self.executing,
            transactions_recorded: self.transactions.len(),
            undo_depth: self.undo_history.undo_depth(),
            redo_depth: self.undo_history.redo_depth(),
            middleware_count: self.pipeline.len(),
            subscriber_count: self.events.subscriber_count(),
        }
    }
}

/// The transaction state machine: snapshot, execute in order, commit or
/// roll back, record history.
fn run_transaction(
    stores: &mut StoreRegistry,
    undo_history: &mut UndoHistory,
    transactions: &mut TransactionHistory,
    events: &EventBus,
    executing: &mut bool,
    commands: Vec<Command>,
) -> ExecutionResult {
    // An empty batch is trivially successful: no snapshot, no history
    // entry, no events.
    if commands.is_empty() {
        return ExecutionResult::success();
    }
    let snapshot = StateSnapshot::capture(stores);
    run_transaction_from(
        stores,
        undo_history,
        transactions,
        events,
        executing,
        commands,
        snapshot,
    )
}

/// Drive a non-empty batch against a given pre-transaction snapshot
fn run_transaction_from(
    stores: &mut StoreRegistry,
    undo_history: &mut UndoHistory,
    transactions: &mut TransactionHistory,
    events: &EventBus,
    executing: &mut bool,
    commands: Vec<Command>,
    snapshot: StateSnapshot,
) -> ExecutionResult {
    if *executing {
        warn!("rejected reentrant transaction while another is executing");
        return ExecutionResult::failure("a transaction is already executing");
    }
    *executing = true;

    let mut tx = Transaction::begin(commands);
    tx.snapshot = Some(snapshot.clone());
    tx.status = TransactionStatus::Executing;
    debug!(transaction = %tx.id, commands = tx.commands.len(), "transaction started");

    let mut executed = Vec::new();
    let mut first_error: Option<String> = None;
    for command in &tx.commands {
        match executor::execute(stores, command) {
            Ok(()) => executed.push(command.clone()),
            Err(err) => {
                first_error = Some(err.to_string());
                break;
            }
        }
    }

    let result = match first_error {
        None => {
            tx.complete(TransactionStatus::Committed, None);
            if let Some(first_undoable) = tx.commands.iter().find(|cmd| cmd.meta.undoable) {
                let entry = UndoEntry::new(first_undoable.clone(), snapshot);
                let description = entry.description.clone();
                undo_history.push(entry);
                events.emit(&OrchestratorEvent::UndoPushed { description });
            }
            debug!(transaction = %tx.id, "transaction committed");
            events.emit(&OrchestratorEvent::TransactionCommitted {
                transaction_id: tx.id,
                command_count: executed.len(),
            });
            ExecutionResult::committed(tx.id, executed)
        }
        Some(cause) => match snapshot.restore(stores) {
            Ok(()) => {
                tx.complete(TransactionStatus::RolledBack, Some(cause.clone()));
                warn!(transaction = %tx.id, error = %cause, "transaction rolled back");
                stores.notifications.push(Notification::error(
                    NotificationCategory::Transaction,
                    cause.clone(),
                ));
                events.emit(&OrchestratorEvent::TransactionRolledBack {
                    transaction_id: tx.id,
                    error: cause.clone(),
                });
                ExecutionResult::transaction_failure(tx.id, cause, executed)
            }
            Err(restore_err) => {
                // The one unrecoverable case: store state may now be
                // inconsistent. Surface it, never re-throw.
                let combined = format!("{cause} (rollback failed: {restore_err})");
                tx.complete(TransactionStatus::Failed, Some(combined.clone()));
                error!(
                    transaction = %tx.id,
                    error = %cause,
                    restore_error = %restore_err,
                    "rollback failed; store state may be inconsistent"
                );
                stores.notifications.push(Notification::error(
                    NotificationCategory::Transaction,
                    combined.clone(),
                ));
                events.emit(&OrchestratorEvent::TransactionRolledBack {
                    transaction_id: tx.id,
                    error: combined.clone(),
                });
                ExecutionResult::transaction_failure(tx.id, combined, executed)
            }
        },
    };

    transactions.record(tx);
    *executing = false;
    result
}
