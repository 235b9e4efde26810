// Lifecycle event bus
//
// Synchronous fan-out of orchestration lifecycle events for debug
// tooling and reactive UI bindings. Emission is fire-and-forget: a
// panicking subscriber is contained and logged, never allowed to break
// a commit or rollback in progress.

use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::warn;
use uuid::Uuid;

/// Events emitted around commits, rollbacks and history moves
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    TransactionCommitted { transaction_id: Uuid, command_count: usize },
    TransactionRolledBack { transaction_id: Uuid, error: String },
    UndoPushed { description: String },
    UndoApplied { description: String },
    RedoApplied { description: String },
}

impl OrchestratorEvent {
    /// Wire label used in log lines and by debugging front-ends
    pub fn name(&self) -> &'static str {
        match self {
            OrchestratorEvent::TransactionCommitted { .. } => "transaction:commit",
            OrchestratorEvent::TransactionRolledBack { .. } => "transaction:rollback",
            OrchestratorEvent::UndoPushed { .. } => "undo:push",
            OrchestratorEvent::UndoApplied { .. } => "undo:undo",
            OrchestratorEvent::RedoApplied { .. } => "undo:redo",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&OrchestratorEvent)>;

/// A plain subscriber set with synchronous emission
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; keep the returned id to unsubscribe
    pub fn subscribe(&mut self, listener: impl Fn(&OrchestratorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if the id was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener, containing panics
    pub fn emit(&self, event: &OrchestratorEvent) {
        for (id, listener) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                warn!(event = event.name(), subscriber = id.0, "event subscriber panicked");
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        bus.subscribe(move |event| seen_clone.borrow_mut().push(event.name()));

        bus.emit(&OrchestratorEvent::UndoPushed {
            description: "x".into(),
        });
        assert_eq!(*seen.borrow(), vec!["undo:push"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let count_clone = Rc::clone(&count);
        let id = bus.subscribe(move |_| *count_clone.borrow_mut() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.emit(&OrchestratorEvent::UndoApplied {
            description: "x".into(),
        });
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_panicking_subscriber_is_contained() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_clone = Rc::clone(&seen);

        bus.subscribe(|_| panic!("bad subscriber"));
        bus.subscribe(move |_| *seen_clone.borrow_mut() += 1);

        // The panic must not prevent delivery to later subscribers
        bus.emit(&OrchestratorEvent::UndoApplied {
            description: "x".into(),
        });
        assert_eq!(*seen.borrow(), 1);
    }
}
