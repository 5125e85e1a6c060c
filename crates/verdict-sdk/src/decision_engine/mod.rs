//! DecisionEngine - Main API for scenario decisions
//!
//! The module is organized into:
//! - `types`: request, decision and case types
//! - `engine`: the `DecisionEngine` use cases (decide, batch decide,
//!   phantom decide, dry-run validation)

mod engine;
mod types;

pub use engine::DecisionEngine;
pub use types::{Decision, DecisionRequest, NewCase};
