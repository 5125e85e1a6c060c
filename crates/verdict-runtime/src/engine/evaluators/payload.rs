//! Payload evaluator

use crate::context::EvaluationContext;
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use verdict_core::{Node, Value};

/// Reads a field of the trigger object.
///
/// The field name is the first positional child. A `nullable: true` named
/// child turns a null or absent field into `Value::Null` instead of an error. In
/// fake-value mode a missing or null field reads as the data model
/// placeholder for its declared type.
pub struct PayloadEvaluator;

#[async_trait]
impl Evaluator for PayloadEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        _env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let field_name = node.read_constant_child_string(0)?;
        let nullable = node.read_constant_named_child_bool_or("nullable", false)?;
        let trigger = &ctx.trigger;

        match trigger.field(field_name) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ if ctx.options.fake_values => Ok(ctx
                .data_model
                .field(&trigger.table_name, field_name)
                .map(|field| field.data_type.placeholder())
                .unwrap_or(Value::Null)),
            _ if nullable => Ok(Value::Null),
            Some(_) => Err(RuntimeError::NullFieldRead(format!(
                "{}.{}",
                trigger.table_name, field_name
            ))),
            None => Err(RuntimeError::PayloadFieldNotFound(format!(
                "{}.{}",
                trigger.table_name, field_name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::EvaluationOptions;
    use crate::engine::evaluators::test_support::{context, eval, scalar_environment};
    use crate::error::RuntimeError;
    use verdict_core::{Function, Node, Value};

    #[tokio::test]
    async fn test_reads_field() {
        let value = eval(&scalar_environment(), &context(), &Node::payload("amount"))
            .await
            .unwrap();
        assert_eq!(value, Value::Number(2000.0));
    }

    #[tokio::test]
    async fn test_null_field() {
        let env = scalar_environment();
        let err = eval(&env, &context(), &Node::payload("note")).await.unwrap_err();
        assert!(matches!(err, RuntimeError::NullFieldRead(field) if field == "transactions.note"));

        let nullable = Node::payload("note").with_named_child("nullable", Node::constant(true));
        assert_eq!(eval(&env, &context(), &nullable).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_missing_field() {
        let err = eval(&scalar_environment(), &context(), &Node::payload("iban"))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::PayloadFieldNotFound(_)));

        let nullable = Node::payload("iban").with_named_child("nullable", Node::constant(true));
        assert_eq!(eval(&scalar_environment(), &context(), &nullable).await.unwrap(), Value::Null);

        let empty = Node::function(Function::IsEmpty).with_child(nullable);
        assert_eq!(eval(&scalar_environment(), &context(), &empty).await.unwrap(), Value::Bool(true));
    }

    #[tokio::test]
    async fn test_fake_values_use_declared_type() {
        let ctx = context().with_options(EvaluationOptions::dry_run());
        let env = scalar_environment();

        // Declared float, null in the payload
        assert_eq!(eval(&env, &ctx, &Node::payload("fee")).await.unwrap(), Value::Number(1.0));
        // Declared string, absent from the payload
        assert_eq!(eval(&env, &ctx, &Node::payload("counterparty_iban")).await.unwrap(), Value::from(""));
        // Present values are kept
        assert_eq!(eval(&env, &ctx, &Node::payload("amount")).await.unwrap(), Value::Number(2000.0));
    }

    #[tokio::test]
    async fn test_field_name_must_be_constant() {
        let node = Node::function(verdict_core::Function::Payload).with_child(Node::payload("amount"));
        let err = eval(&scalar_environment(), &context(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::WrongNodeShape(_)));
    }
}
