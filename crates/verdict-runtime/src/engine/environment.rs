//! Evaluation environment
//!
//! Maps function tags to evaluators for the lifetime of one evaluation and
//! drives the recursive tree walk. This is the single dispatch point on
//! function tags.

use super::evaluator::Evaluator;
use crate::context::EvaluationContext;
use crate::error::{Result, RuntimeError};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use verdict_core::{Function, Node, Value};

/// Registry of evaluators, one per function tag
#[derive(Default)]
pub struct EvaluationEnvironment {
    evaluators: HashMap<Function, Arc<dyn Evaluator>>,
}

impl EvaluationEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the evaluator for `function`.
    ///
    /// # Panics
    ///
    /// Registering the same tag twice is a programmer error and panics.
    pub fn add_evaluator(&mut self, function: Function, evaluator: Arc<dyn Evaluator>) {
        if self.evaluators.contains_key(&function) {
            panic!("an evaluator is already registered for function '{}'", function);
        }
        self.evaluators.insert(function, evaluator);
    }

    pub fn has_evaluator(&self, function: &Function) -> bool {
        self.evaluators.contains_key(function)
    }

    /// Evaluate a node.
    ///
    /// Constant leaves yield their literal; function nodes are handed to
    /// their registered evaluator. Errors are propagated untouched.
    pub fn evaluate<'a>(
        &'a self,
        ctx: &'a EvaluationContext,
        node: &'a Node,
    ) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            node.check_shape()?;
            if node.is_constant() {
                return Ok(node.constant_value());
            }

            let evaluator = self
                .evaluators
                .get(&node.function)
                .ok_or_else(|| RuntimeError::UnknownFunction(node.function.to_string()))?;

            tracing::trace!(function = %node.function, "evaluating node");
            evaluator.evaluate(ctx, node, self).await
        })
    }

    /// Evaluate every positional child in order
    pub async fn evaluate_children(&self, ctx: &EvaluationContext, node: &Node) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(node.children.len());
        for child in &node.children {
            values.push(self.evaluate(ctx, child).await?);
        }
        Ok(values)
    }

    /// Evaluate exactly `count` positional children
    pub async fn evaluate_exact_children(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        count: usize,
    ) -> Result<Vec<Value>> {
        if node.children.len() != count {
            return Err(RuntimeError::InvalidArgument(format!(
                "function '{}' expects {} argument(s), got {}",
                node.function,
                count,
                node.children.len()
            )));
        }
        self.evaluate_children(ctx, node).await
    }

    /// Evaluate a required named child
    pub async fn evaluate_named_child(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        name: &str,
    ) -> Result<Value> {
        let child = node.required_named_child(name)?;
        self.evaluate(ctx, child).await
    }

    /// Evaluate an optional named child
    pub async fn evaluate_optional_named_child(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        name: &str,
    ) -> Result<Option<Value>> {
        match node.named_child(name) {
            Some(child) => Ok(Some(self.evaluate(ctx, child).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use verdict_core::{DataModel, TriggerObject};

    struct Echo;

    #[async_trait]
    impl Evaluator for Echo {
        async fn evaluate(
            &self,
            ctx: &EvaluationContext,
            node: &Node,
            env: &EvaluationEnvironment,
        ) -> Result<Value> {
            let values = env.evaluate_children(ctx, node).await?;
            Ok(Value::Array(values))
        }
    }

    fn ctx() -> EvaluationContext {
        EvaluationContext::new(
            "org-1",
            Arc::new(TriggerObject::new("transactions")),
            Arc::new(DataModel::new()),
        )
    }

    #[tokio::test]
    async fn test_constant_leaf() {
        let env = EvaluationEnvironment::new();
        let value = env.evaluate(&ctx(), &Node::constant("x")).await.unwrap();
        assert_eq!(value, Value::from("x"));
    }

    #[tokio::test]
    async fn test_unknown_function_fails() {
        let env = EvaluationEnvironment::new();
        let node = Node::function(Function::Custom("Levenshtein".to_string()));
        let err = env.evaluate(&ctx(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownFunction(name) if name == "Levenshtein"));
    }

    #[tokio::test]
    async fn test_nested_evaluation_goes_through_registry() {
        let mut env = EvaluationEnvironment::new();
        let echo = Function::Custom("Echo".to_string());
        env.add_evaluator(echo.clone(), Arc::new(Echo));

        let node = Node::function(echo.clone())
            .with_child(Node::constant(1))
            .with_child(Node::function(echo).with_child(Node::constant(2)));

        let value = env.evaluate(&ctx(), &node).await.unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Number(1.0), Value::Array(vec![Value::Number(2.0)])])
        );
    }

    #[tokio::test]
    async fn test_malformed_node_fails() {
        let env = EvaluationEnvironment::new();
        let node = Node {
            constant: Some(Value::Number(1.0)),
            children: vec![Node::constant(2)],
            ..Default::default()
        };
        let err = env.evaluate(&ctx(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::WrongNodeShape(_)));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut env = EvaluationEnvironment::new();
        env.add_evaluator(Function::Add, Arc::new(Echo));
        env.add_evaluator(Function::Add, Arc::new(Echo));
    }
}
