//! Evaluator capability

use super::environment::EvaluationEnvironment;
use crate::context::EvaluationContext;
use crate::error::Result;
use async_trait::async_trait;
use verdict_core::{Node, Value};

/// Gives meaning to one function tag.
///
/// Children are evaluated through `env`, so nested trees always compose
/// through the registry and never through direct evaluator-to-evaluator calls.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value>;
}
