//! Expression evaluation engine
//!
//! - `evaluator`: the capability every function implementation provides
//! - `environment`: the per-evaluation registry and recursive driver
//! - `factory`: builds a fresh environment with the built-in catalog
//! - `evaluators`: built-in evaluators, one per function tag
//! - `operators`: pure value-level semantics shared by the evaluators

pub mod environment;
pub mod evaluator;
pub mod evaluators;
pub mod factory;
pub mod operators;

pub use environment::EvaluationEnvironment;
pub use evaluator::Evaluator;
pub use factory::EnvironmentFactory;
