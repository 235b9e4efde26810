// RankGrid - Transactional command orchestration for ranking sessions

pub mod command;
pub mod store;

// Re-export commonly used types for convenience
pub use command::{
    Command, CommandKind, ExecutionResult, LoggingMiddleware, Middleware, Orchestrator,
    OrchestratorConfig, OrchestratorEvent, PersistenceMiddleware, SaveSignal, TransactionStatus,
    ValidationMiddleware,
};
pub use store::{RankedItem, StoreRegistry};
