//! Abstract Syntax Tree (AST) definitions for Verdict
//!
//! This module contains:
//! - Expression nodes and their function tags
//! - Rules, scenario iterations and scenarios
//! - Decision outcomes and score thresholds
//! - Trigger objects

pub mod function;
pub mod node;
pub mod outcome;
pub mod scenario;
pub mod trigger;

pub use function::Function;
pub use node::Node;
pub use outcome::{Outcome, ScoreThresholds};
pub use scenario::{Rule, Scenario, ScenarioIteration};
pub use trigger::TriggerObject;
