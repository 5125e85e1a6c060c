//! Execution result types

mod execution;

pub use execution::{RuleExecution, RuleExecutionError, ScenarioExecution};
