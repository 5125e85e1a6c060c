//! Runtime error types

use thiserror::Error;
use verdict_core::CoreError;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A field read returned null and the read was not nullable
    #[error("Null field read: {0}")]
    NullFieldRead(String),

    /// The trigger payload has no such field
    #[error("Payload field not found: {0}")]
    PayloadFieldNotFound(String),

    /// An aggregation matched no rows
    #[error("No rows read: {0}")]
    NoRowsRead(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// No evaluator registered for the node's function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Node does not have the shape its evaluator expects
    #[error("Wrong node shape: {0}")]
    WrongNodeShape(#[from] CoreError),

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Invalid argument passed to a function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying data store failure
    #[error("Data store error: {0}")]
    DataStore(String),

    /// Referenced custom list does not exist
    #[error("Custom list not found: {0}")]
    ListNotFound(String),

    /// The caller cancelled the evaluation
    #[error("Evaluation cancelled")]
    Cancelled,

    /// A runtime fault was caught at the evaluation boundary
    #[error("Scenario evaluation panicked")]
    EvaluationPanicked,

    /// Scenario has no live iteration
    #[error("Scenario {0} has no live iteration")]
    NoLiveIteration(String),

    /// Trigger object table differs from the scenario's trigger table
    #[error("Trigger object table '{actual}' does not match scenario trigger table '{expected}'")]
    TriggerTableMismatch { expected: String, actual: String },

    /// Invalid scenario configuration
    #[error("Invalid scenario configuration: {0}")]
    InvalidConfiguration(String),

    /// Trigger condition failed with a fatal error
    #[error("Trigger condition evaluation failed: {0}")]
    TriggerConditionFailed(#[source] Box<RuntimeError>),

    /// A rule failed with a fatal error
    #[error("Rule '{rule_id}' evaluation failed: {source}")]
    RuleFailed {
        rule_id: String,
        #[source]
        source: Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Configuration errors are never retried
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::NoLiveIteration(_)
                | RuntimeError::TriggerTableMismatch { .. }
                | RuntimeError::InvalidConfiguration(_)
        )
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
