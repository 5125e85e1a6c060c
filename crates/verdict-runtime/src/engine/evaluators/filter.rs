//! Filter evaluator

use crate::context::EvaluationContext;
use crate::datasource::{Filter, FilterOperator};
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use verdict_core::{Node, Value};

/// Builds a filter predicate for `DatabaseAccess` and `Aggregator`.
///
/// `tableName`, `fieldName` and `operator` are constants; `value` is an
/// arbitrary sub-expression evaluated here. The result is the filter encoded
/// as an object value.
pub struct FilterEvaluator;

#[async_trait]
impl Evaluator for FilterEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let table_name = node.read_constant_named_child_string("tableName")?;
        let field_name = node.read_constant_named_child_string("fieldName")?;
        let operator_name = node.read_constant_named_child_string("operator")?;

        let operator = FilterOperator::from_name(operator_name).ok_or_else(|| {
            RuntimeError::InvalidArgument(format!("unknown filter operator '{}'", operator_name))
        })?;

        if let Some(table) = ctx.data_model.table(table_name) {
            if table.field(field_name).is_none() {
                return Err(RuntimeError::InvalidArgument(format!(
                    "filter field '{}' not found on table '{}'",
                    field_name, table_name
                )));
            }
        }

        let value = if operator.is_unary() {
            Value::Null
        } else {
            env.evaluate_named_child(ctx, node, "value").await?
        };

        Ok(Filter::new(table_name, field_name, operator, value).to_value())
    }
}

/// Decode the evaluated `filters` child of a data access node.
///
/// Accepts a list of filter objects, a single filter object, or null.
pub(crate) fn decode_filters(value: Value) -> Result<Vec<Filter>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(Filter::from_value).collect(),
        object @ Value::Object(_) => Ok(vec![Filter::from_value(&object)?]),
        other => Err(RuntimeError::TypeError(format!(
            "filters must be a list of filters, got {}",
            other.type_name()
        ))),
    }
}
