//! Verdict Runtime - Scenario evaluation engine
//!
//! Evaluates expression trees through a registry of evaluators, one per
//! function tag, and composes them into scored scenario decisions.

pub mod context;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod lists;
pub mod observability;
pub mod result;
pub mod scenario;

// Re-export main types
pub use context::{CancellationFlag, EvaluationContext, EvaluationOptions};
pub use datasource::{
    AggregateRequest, AggregationType, DataAccessor, Filter, FilterOperator, InMemoryDataStore,
    ReadFieldRequest, RelatedRows,
};
pub use engine::{EnvironmentFactory, EvaluationEnvironment, Evaluator};
pub use error::{Result, RuntimeError};
pub use lists::{ListBackend, ListService, MemoryBackend};
pub use observability::{Metrics, MetricsCollector};
pub use result::{RuleExecution, RuleExecutionError, ScenarioExecution};
pub use scenario::{
    EvaluationState, ScenarioEvaluationParams, ScenarioEvaluator, ValidationIssue, ValidationReport,
};
