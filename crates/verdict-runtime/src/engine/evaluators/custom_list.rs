//! Custom list evaluator

use crate::context::EvaluationContext;
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::error::{Result, RuntimeError};
use crate::lists::ListService;
use async_trait::async_trait;
use std::sync::Arc;
use verdict_core::{Node, Value};

/// Queries a named custom list.
///
/// With a `value` named child the result is its membership in the list
/// identified by `customListId`; without one it is the list's values.
pub struct CustomListEvaluator {
    list_service: Arc<ListService>,
}

impl CustomListEvaluator {
    pub fn new(list_service: Arc<ListService>) -> Self {
        Self { list_service }
    }
}

#[async_trait]
impl Evaluator for CustomListEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let list_id = node.read_constant_named_child_string("customListId")?;
        let value = env.evaluate_optional_named_child(ctx, node, "value").await?;

        if !self.list_service.has_list(list_id).await {
            return Err(RuntimeError::ListNotFound(list_id.to_string()));
        }

        if ctx.options.fake_values {
            return Ok(match value {
                Some(_) => Value::Bool(false),
                None => Value::Array(Vec::new()),
            });
        }

        match value {
            Some(value) => {
                let found = self.list_service.contains(list_id, &value).await?;
                tracing::debug!(list_id, found, "custom list lookup");
                Ok(Value::Bool(found))
            }
            None => Ok(Value::Array(self.list_service.get_all(list_id).await?)),
        }
    }
}
