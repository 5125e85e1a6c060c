//! Verdict Core - Core types and definitions for the Verdict decision engine
//!
//! This crate provides the fundamental types shared by the engine:
//! - Value types for runtime data
//! - The expression AST (`Node` and its `Function` tags)
//! - Scenario, iteration and rule definitions
//! - The tenant data model (tables, fields, links)
//! - Error types

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{Function, Node, Outcome, Rule, Scenario, ScenarioIteration, ScoreThresholds, TriggerObject};
pub use error::{CoreError, Result};
pub use types::{DataModel, DataType, Field, LinkToSingle, Table, Value};
