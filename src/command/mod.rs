// Transactional command orchestration
//
// All state-changing operations on the ranking session go through
// commands. The flow:
//
// - Command factories build immutable value objects (model.rs)
// - The middleware pipeline wraps top-level dispatch (middleware.rs)
// - The executor maps each command to one store action plus its paired
//   consistency updates (executor.rs)
// - The orchestrator runs batches atomically over snapshots and keeps
//   undo/redo history (orchestrator.rs, transaction.rs, snapshot.rs,
//   history.rs)
// - Lifecycle events fan out on the event bus (events.rs)

pub mod events;
pub mod executor;
pub mod history;
pub mod middleware;
pub mod model;
pub mod orchestrator;
pub mod result;
pub mod snapshot;
pub mod transaction;

pub use events::{EventBus, OrchestratorEvent, SubscriptionId};
pub use history::{UndoEntry, UndoHistory};
pub use middleware::{
    LoggingMiddleware, Middleware, MiddlewarePipeline, PersistenceMiddleware, SaveSignal,
    ValidationMiddleware,
};
pub use model::{Command, CommandFamily, CommandKind, CommandMeta};
pub use orchestrator::{DebugSnapshot, Orchestrator, OrchestratorConfig};
pub use result::{CommandError, CommandResult, ExecutionResult};
pub use snapshot::StateSnapshot;
pub use transaction::{Transaction, TransactionStatus};
