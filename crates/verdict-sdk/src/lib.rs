//! Verdict Decision Engine SDK
//!
//! High-level API on top of the scenario runtime: turning trigger objects
//! into persisted decisions, testing draft iterations against live data and
//! dry-run validation of scenario definitions.

pub mod builder;
pub mod config;
pub mod decision_engine;
pub mod error;
pub mod logging;
pub mod repository;

// Re-export main types
pub use builder::DecisionEngineBuilder;
pub use config::{EngineConfig, EvaluationConfig};
pub use decision_engine::{Decision, DecisionEngine, DecisionRequest, NewCase};
pub use error::{Result, SdkError};
pub use logging::init_tracing;
pub use repository::{DecisionStore, MemoryDecisionStore, MemoryScenarioRepository, ScenarioRepository};

// Re-export commonly used types from dependencies
pub use verdict_core::{Outcome, Scenario, ScenarioIteration, TriggerObject, Value};
pub use verdict_runtime::{CancellationFlag, MetricsCollector, ScenarioExecution, ValidationReport};
