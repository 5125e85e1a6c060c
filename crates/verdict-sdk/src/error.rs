//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] verdict_runtime::RuntimeError),

    /// Core error
    #[error("Core error: {0}")]
    CoreError(#[from] verdict_core::CoreError),

    /// Scenario does not exist for the organization
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// Iteration referenced by a scenario does not exist
    #[error("Iteration '{iteration_id}' of scenario '{scenario_id}' not found")]
    IterationNotFound {
        scenario_id: String,
        iteration_id: String,
    },

    /// Organization has no data model
    #[error("Data model not found for organization {0}")]
    DataModelNotFound(String),

    /// Repository or decision store failure
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<config::ConfigError> for SdkError {
    fn from(error: config::ConfigError) -> Self {
        SdkError::ConfigError(error.to_string())
    }
}

impl From<serde_yaml::Error> for SdkError {
    fn from(error: serde_yaml::Error) -> Self {
        SdkError::ConfigError(error.to_string())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
