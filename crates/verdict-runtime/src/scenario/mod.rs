//! Scenario evaluation
//!
//! Turns a scenario iteration and a trigger object into a scored
//! [`ScenarioExecution`](crate::result::ScenarioExecution):
//! - `executor`: trigger condition, rules, score and outcome, behind a
//!   panic boundary
//! - `state`: the evaluation state machine
//! - `validation`: dry-run validation of an iteration with fake values

mod executor;
mod state;
mod validation;

pub use executor::{ScenarioEvaluationParams, ScenarioEvaluator};
pub use state::EvaluationState;
pub use validation::{ValidationIssue, ValidationReport};
