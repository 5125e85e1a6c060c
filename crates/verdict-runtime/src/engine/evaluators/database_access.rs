//! Database access evaluator

use super::filter::decode_filters;
use crate::context::EvaluationContext;
use crate::datasource::{DataAccessor, ReadFieldRequest};
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::sync::Arc;
use verdict_core::{Node, Value};

/// Reads a field of the row reached from the trigger object through a path
/// of link-to-single relations.
///
/// Named children: `tableName` (the trigger table), `fieldName`, `path`
/// (link names), and optionally `filters` and `nullable`.
pub struct DatabaseAccessEvaluator {
    data_accessor: Arc<dyn DataAccessor>,
}

impl DatabaseAccessEvaluator {
    pub fn new(data_accessor: Arc<dyn DataAccessor>) -> Self {
        Self { data_accessor }
    }
}

#[async_trait]
impl Evaluator for DatabaseAccessEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let table_name = node.read_constant_named_child_string("tableName")?;
        let field_name = node.read_constant_named_child_string("fieldName")?;
        let path = node.read_constant_named_child_string_slice("path")?;
        let nullable = node.read_constant_named_child_bool_or("nullable", false)?;

        if table_name != ctx.trigger.table_name {
            return Err(RuntimeError::InvalidArgument(format!(
                "database access starts from table '{}' but the trigger object is a '{}'",
                table_name, ctx.trigger.table_name
            )));
        }

        let links = ctx.data_model.resolve_link_path(table_name, &path)?;
        let target_table = links
            .last()
            .map(|link| link.parent_table_name.as_str())
            .unwrap_or(table_name);

        let filters = match env.evaluate_optional_named_child(ctx, node, "filters").await? {
            Some(value) => decode_filters(value)?,
            None => Vec::new(),
        };

        if ctx.options.fake_values {
            let field = ctx.data_model.field(target_table, field_name).ok_or_else(|| {
                RuntimeError::InvalidArgument(format!(
                    "field '{}' not found on table '{}'",
                    field_name, target_table
                ))
            })?;
            return Ok(field.data_type.placeholder());
        }

        let request = ReadFieldRequest {
            organization_id: ctx.organization_id.clone(),
            trigger: ctx.trigger.clone(),
            links,
            field_name: field_name.to_string(),
            filters,
        };

        let qualified = || {
            let mut parts = vec![table_name];
            parts.extend(path.iter().copied());
            parts.push(field_name);
            parts.join(".")
        };

        match self.data_accessor.read_field(&request).await? {
            Some(value) if !value.is_null() => Ok(value),
            _ if nullable => Ok(Value::Null),
            Some(_) => Err(RuntimeError::NullFieldRead(qualified())),
            None => {
                tracing::debug!(field = %qualified(), "no row found for database access");
                Err(RuntimeError::NullFieldRead(qualified()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::EvaluationOptions;
    use crate::datasource::InMemoryDataStore;
    use crate::engine::evaluators::test_support::{
        account_status, context, counting_environment, environment, eval, sample_store,
    };
    use crate::error::RuntimeError;
    use crate::lists::ListService;
    use std::sync::Arc;
    use verdict_core::{Function, Node, Value};

    #[tokio::test]
    async fn test_reads_through_links() {
        let env = environment(Arc::new(sample_store()), ListService::new());
        let value = eval(&env, &context(), &account_status()).await.unwrap();
        assert_eq!(value, Value::from("frozen"));
    }

    #[tokio::test]
    async fn test_two_hop_path() {
        let env = environment(Arc::new(sample_store()), ListService::new());
        let node = Node::function(Function::DatabaseAccess)
            .with_named_child("tableName", Node::constant("transactions"))
            .with_named_child("fieldName", Node::constant("country"))
            .with_named_child(
                "path",
                Node::constant(Value::Array(vec![Value::from("account"), Value::from("company")])),
            );
        assert_eq!(eval(&env, &context(), &node).await.unwrap(), Value::from("FR"));
    }

    #[tokio::test]
    async fn test_missing_row_is_null_read() {
        let env = environment(Arc::new(InMemoryDataStore::new()), ListService::new());
        let err = eval(&env, &context(), &account_status()).await.unwrap_err();
        assert!(
            matches!(err, RuntimeError::NullFieldRead(field) if field == "transactions.account.status")
        );

        let nullable = account_status().with_named_child("nullable", Node::constant(true));
        assert_eq!(eval(&env, &context(), &nullable).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_filters_apply_to_the_final_row() {
        let env = environment(Arc::new(sample_store()), ListService::new());
        let filter = Node::function(Function::Filter)
            .with_named_child("tableName", Node::constant("accounts"))
            .with_named_child("fieldName", Node::constant("status"))
            .with_named_child("operator", Node::constant("eq"))
            .with_named_child("value", Node::constant("active"));
        let node = account_status()
            .with_named_child("filters", Node::function(Function::List).with_child(filter));

        let err = eval(&env, &context(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::NullFieldRead(_)));
    }

    #[tokio::test]
    async fn test_table_must_match_trigger() {
        let env = environment(Arc::new(sample_store()), ListService::new());
        let node = Node::function(Function::DatabaseAccess)
            .with_named_child("tableName", Node::constant("accounts"))
            .with_named_child("fieldName", Node::constant("status"));
        let err = eval(&env, &context(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unknown_link_is_malformed() {
        let env = environment(Arc::new(sample_store()), ListService::new());
        let node = Node::function(Function::DatabaseAccess)
            .with_named_child("tableName", Node::constant("transactions"))
            .with_named_child("fieldName", Node::constant("status"))
            .with_named_child("path", Node::constant(Value::Array(vec![Value::from("merchant")])));
        let err = eval(&env, &context(), &node).await.unwrap_err();
        assert!(matches!(err, RuntimeError::WrongNodeShape(_)));
    }

    #[tokio::test]
    async fn test_fake_values_skip_the_store() {
        let (env, calls) = counting_environment();
        let ctx = context().with_options(EvaluationOptions::dry_run());

        let value = eval(&env, &ctx, &account_status()).await.unwrap();
        assert_eq!(value, Value::from(""));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
