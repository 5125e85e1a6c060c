//! Error types for Verdict Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Missing named child: {0}")]
    MissingNamedChild(String),

    #[error("Missing child at position {0}")]
    MissingChild(usize),

    #[error("Child '{name}' is not a constant {expected}")]
    WrongConstantType { name: String, expected: &'static str },

    #[error("Malformed node: {0}")]
    MalformedNode(String),

    #[error("Invalid data model: {0}")]
    InvalidDataModel(String),

    #[error("Invalid scenario configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_constant_type_message() {
        let err = CoreError::WrongConstantType {
            name: "tableName".to_string(),
            expected: "string",
        };
        assert_eq!(err.to_string(), "Child 'tableName' is not a constant string");
    }

    #[test]
    fn test_missing_named_child_message() {
        let err = CoreError::MissingNamedChild("fieldName".to_string());
        assert!(err.to_string().contains("fieldName"));
    }
}
