// Middleware pipeline
//
// An ordered chain of interceptors wrapping top-level command dispatch.
// Each middleware receives the command and a `next` continuation it may
// call at most once; skipping the call short-circuits the command.
// Entries run in ascending priority order, so priority 0 wraps
// everything and the highest priority runs innermost, closest to the
// executor's own result.

use crate::command::model::{Command, CommandKind};
use crate::command::result::ExecutionResult;
use crate::store::now_millis;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Continuation handed to middleware; calls the rest of the chain
pub type Next<'a> = dyn FnMut(&Command) -> ExecutionResult + 'a;

/// A cross-cutting interceptor around command dispatch
pub trait Middleware {
    /// Unique name; registering a second middleware with the same name
    /// replaces the first
    fn name(&self) -> &str;

    /// Lower priorities run first (outermost)
    fn priority(&self) -> i32 {
        0
    }

    /// Wrap the inner dispatch
    ///
    /// Call `next` at most once and return its (possibly modified)
    /// result, or skip it to short-circuit the command.
    fn handle(&mut self, command: &Command, next: &mut Next<'_>) -> ExecutionResult;
}

struct MiddlewareEntry {
    name: String,
    priority: i32,
    enabled: bool,
    handler: Box<dyn Middleware>,
}

/// Priority-ordered middleware chain
#[derive(Default)]
pub struct MiddlewarePipeline {
    entries: Vec<MiddlewareEntry>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a middleware, replacing any existing one with the same
    /// name, and re-sort by priority
    pub fn register(&mut self, handler: Box<dyn Middleware>) {
        let name = handler.name().to_string();
        let priority = handler.priority();
        self.entries.retain(|entry| entry.name != name);
        self.entries.push(MiddlewareEntry {
            name,
            priority,
            enabled: true,
            handler,
        });
        self.entries.sort_by_key(|entry| entry.priority);
    }

    /// Deregister by name; returns false if nothing matched
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }

    /// Toggle a middleware without deregistering it
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `command` through the chain down to `terminal`
    pub fn run(&mut self, command: &Command, terminal: &mut Next<'_>) -> ExecutionResult {
        dispatch(&mut self.entries, command, terminal)
    }
}

fn dispatch(
    entries: &mut [MiddlewareEntry],
    command: &Command,
    terminal: &mut Next<'_>,
) -> ExecutionResult {
    let Some((entry, rest)) = entries.split_first_mut() else {
        return terminal(command);
    };
    if !entry.enabled {
        return dispatch(rest, command, terminal);
    }
    entry
        .handler
        .handle(command, &mut |cmd: &Command| dispatch(rest, cmd, terminal))
}

impl std::fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| {
                (entry.name.as_str(), entry.priority, entry.enabled)
            }))
            .finish()
    }
}

/// Logs every dispatched command and its outcome (priority 0, outermost)
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn handle(&mut self, command: &Command, next: &mut Next<'_>) -> ExecutionResult {
        debug!(
            correlation_id = %command.meta.correlation_id,
            source = command.meta.source.as_deref().unwrap_or("-"),
            "dispatch: {}",
            command.description()
        );
        let result = next(command);
        if result.success {
            debug!(correlation_id = %command.meta.correlation_id, "ok");
        } else {
            warn!(
                correlation_id = %command.meta.correlation_id,
                error = result.error.as_deref().unwrap_or("-"),
                "command failed"
            );
        }
        result
    }
}

/// Rejects structurally malformed payloads before they reach the
/// executor (priority 50)
///
/// Only shape is checked here: empty ids, zero sizes. Semantic
/// validation (bounds, occupancy) needs store state and stays in the
/// executor.
pub struct ValidationMiddleware;

impl ValidationMiddleware {
    fn check(command: &Command) -> Result<(), String> {
        match &command.kind {
            CommandKind::AssignItem { item, .. } | CommandKind::AddToComparison { item } => {
                if item.id.is_empty() {
                    return Err("item id must not be empty".into());
                }
            }
            CommandKind::RemoveItemById { item_id }
            | CommandKind::RemoveFromComparison { item_id } => {
                if item_id.is_empty() {
                    return Err("item id must not be empty".into());
                }
            }
            CommandKind::SwitchSession { list_id } => {
                if list_id.is_empty() {
                    return Err("list id must not be empty".into());
                }
            }
            CommandKind::InitializeSession { list_id, grid_size, .. } => {
                if list_id.is_empty() {
                    return Err("list id must not be empty".into());
                }
                if *grid_size == 0 {
                    return Err("grid size must be at least 1".into());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl Middleware for ValidationMiddleware {
    fn name(&self) -> &str {
        "validation"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn handle(&mut self, command: &Command, next: &mut Next<'_>) -> ExecutionResult {
        match Self::check(command) {
            Ok(()) => next(command),
            Err(reason) => ExecutionResult::failure(format!("validation: {reason}")),
        }
    }
}

/// Shared flag the host polls to drive debounced persistence
#[derive(Clone, Default)]
pub struct SaveSignal {
    inner: Rc<RefCell<SaveState>>,
}

#[derive(Default)]
struct SaveState {
    pending: bool,
    last_mutation_ms: u64,
    debounce_ms: u64,
}

impl SaveSignal {
    /// A save has been requested but may still be inside the debounce
    /// window
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().pending
    }

    /// Take the save request once the debounce window has elapsed
    ///
    /// Returns true exactly once per settled mutation burst; the host
    /// then persists the session out of band. Deferred saves are
    /// fire-and-forget follow-up, outside any transaction's atomicity.
    pub fn take_pending_save(&self) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.pending && now_millis().saturating_sub(state.last_mutation_ms) >= state.debounce_ms
        {
            state.pending = false;
            return true;
        }
        false
    }
}

/// Marks a save as due after successful undoable commands, debounced
/// (priority 100, innermost)
pub struct PersistenceMiddleware {
    signal: SaveSignal,
}

impl PersistenceMiddleware {
    /// `debounce_ms` of 0 makes every mutation immediately due
    pub fn new(debounce_ms: u64) -> (Self, SaveSignal) {
        let signal = SaveSignal::default();
        signal.inner.borrow_mut().debounce_ms = debounce_ms;
        (
            Self {
                signal: signal.clone(),
            },
            signal,
        )
    }
}

impl Middleware for PersistenceMiddleware {
    fn name(&self) -> &str {
        "persistence"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn handle(&mut self, command: &Command, next: &mut Next<'_>) -> ExecutionResult {
        let result = next(command);
        if result.success && command.meta.undoable {
            let mut state = self.signal.inner.borrow_mut();
            state.pending = true;
            state.last_mutation_ms = now_millis();
        }
        result
    }
}
