//! Aggregator evaluator

use super::filter::decode_filters;
use crate::context::EvaluationContext;
use crate::datasource::{AggregateRequest, AggregationType, DataAccessor, RelatedRows};
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::sync::Arc;
use verdict_core::{DataModel, LinkToSingle, Node, Value};

/// Reduces a field over the rows of a table that match the node's filters.
///
/// Named children: `tableName`, `fieldName`, `aggregator` (count,
/// count_distinct, sum, avg, min, max), optionally `filters` and a
/// free-form `label`. Every filter must target the aggregated table.
///
/// An optional `path` of link names walks from the trigger object to an
/// anchor row; only rows of `tableName` linking to that row are reduced.
/// The link back to the anchor is the one named by `linkName`, or the only
/// link of `tableName` pointing at the anchor's table.
pub struct AggregatorEvaluator {
    data_accessor: Arc<dyn DataAccessor>,
}

impl AggregatorEvaluator {
    pub fn new(data_accessor: Arc<dyn DataAccessor>) -> Self {
        Self { data_accessor }
    }
}

#[async_trait]
impl Evaluator for AggregatorEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let table_name = node.read_constant_named_child_string("tableName")?;
        let field_name = node.read_constant_named_child_string("fieldName")?;
        let aggregator_name = node.read_constant_named_child_string("aggregator")?;

        let aggregation = AggregationType::from_name(aggregator_name).ok_or_else(|| {
            RuntimeError::InvalidArgument(format!("unknown aggregator '{}'", aggregator_name))
        })?;

        let filters = match env.evaluate_optional_named_child(ctx, node, "filters").await? {
            Some(value) => decode_filters(value)?,
            None => Vec::new(),
        };
        if let Some(foreign) = filters.iter().find(|f| f.table_name != table_name) {
            return Err(RuntimeError::InvalidArgument(format!(
                "filter on table '{}' cannot be applied to an aggregation over '{}'",
                foreign.table_name, table_name
            )));
        }

        let related = match node.named_child("path") {
            Some(_) => {
                let path = node.read_constant_named_child_string_slice("path")?;
                let link_name = node.read_optional_constant_named_child_string("linkName")?;
                let links = ctx.data_model.resolve_link_path(&ctx.trigger.table_name, &path)?;
                let anchor_table = links
                    .last()
                    .map(|link| link.parent_table_name.as_str())
                    .unwrap_or(&ctx.trigger.table_name);
                let back_link = back_link(&ctx.data_model, table_name, anchor_table, link_name)?;
                Some(RelatedRows {
                    trigger: ctx.trigger.clone(),
                    links,
                    back_link,
                })
            }
            None => None,
        };

        if ctx.options.fake_values {
            if ctx.data_model.field(table_name, field_name).is_none() {
                return Err(RuntimeError::InvalidArgument(format!(
                    "field '{}' not found on table '{}'",
                    field_name, table_name
                )));
            }
            return Ok(Value::Number(1.0));
        }

        let request = AggregateRequest {
            organization_id: ctx.organization_id.clone(),
            table_name: table_name.to_string(),
            field_name: field_name.to_string(),
            aggregation,
            filters,
            related,
        };

        match self.data_accessor.aggregate(&request).await? {
            Some(value) => Ok(value),
            None => Err(RuntimeError::NoRowsRead(format!(
                "{:?} of {}.{}",
                aggregation, table_name, field_name
            ))),
        }
    }
}

/// Link of `table_name` whose parent is `anchor_table`
fn back_link(
    data_model: &DataModel,
    table_name: &str,
    anchor_table: &str,
    link_name: Option<&str>,
) -> Result<LinkToSingle> {
    let table = data_model.table(table_name).ok_or_else(|| {
        RuntimeError::InvalidArgument(format!("table '{}' not found", table_name))
    })?;

    let mut candidates = table
        .links_to_single
        .values()
        .filter(|link| link.parent_table_name == anchor_table)
        .filter(|link| link_name.map_or(true, |name| link.name == name));

    match (candidates.next(), candidates.next()) {
        (Some(link), None) => Ok(link.clone()),
        (None, _) => Err(RuntimeError::InvalidArgument(format!(
            "table '{}' has no link to '{}'",
            table_name, anchor_table
        ))),
        (Some(_), Some(_)) => Err(RuntimeError::InvalidArgument(format!(
            "table '{}' has several links to '{}', set linkName",
            table_name, anchor_table
        ))),
    }
}
