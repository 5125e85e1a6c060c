//! Data access requests

use crate::engine::operators::{execute_compare, execute_string_op, list_contains, CompareOp, StringOp};
use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use verdict_core::{LinkToSingle, TriggerObject, Value};

/// Filter condition on one field of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Table the filtered field belongs to
    pub table_name: String,

    /// Field to filter on
    pub field_name: String,

    pub operator: FilterOperator,

    /// Value to compare against (already evaluated)
    #[serde(default)]
    pub value: Value,
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl FilterOperator {
    /// Parse an operator from its external name
    pub fn from_name(name: &str) -> Option<Self> {
        let operator = match name {
            "eq" | "=" => FilterOperator::Eq,
            "ne" | "!=" => FilterOperator::Ne,
            "gt" | ">" => FilterOperator::Gt,
            "ge" | ">=" => FilterOperator::Ge,
            "lt" | "<" => FilterOperator::Lt,
            "le" | "<=" => FilterOperator::Le,
            "in" => FilterOperator::In,
            "not_in" => FilterOperator::NotIn,
            "starts_with" => FilterOperator::StartsWith,
            "ends_with" => FilterOperator::EndsWith,
            "is_empty" => FilterOperator::IsEmpty,
            "is_not_empty" => FilterOperator::IsNotEmpty,
            _ => return None,
        };
        Some(operator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Ge => "ge",
            FilterOperator::Lt => "lt",
            FilterOperator::Le => "le",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
        }
    }

    /// Operators that take no comparison value
    pub fn is_unary(&self) -> bool {
        matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }
}

impl Filter {
    pub fn new(
        table_name: impl Into<String>,
        field_name: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            field_name: field_name.into(),
            operator,
            value: value.into(),
        }
    }

    /// Encode as the object value produced by the `Filter` function
    pub fn to_value(&self) -> Value {
        let mut map = HashMap::new();
        map.insert("tableName".to_string(), Value::String(self.table_name.clone()));
        map.insert("fieldName".to_string(), Value::String(self.field_name.clone()));
        map.insert(
            "operator".to_string(),
            Value::String(self.operator.as_str().to_string()),
        );
        map.insert("value".to_string(), self.value.clone());
        Value::Object(map)
    }

    /// Decode the object value produced by the `Filter` function
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            RuntimeError::TypeError(format!("expected a filter object, got {}", value.type_name()))
        })?;

        let read_string = |key: &str| -> Result<String> {
            map.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| RuntimeError::InvalidArgument(format!("filter is missing '{}'", key)))
        };

        let operator_name = read_string("operator")?;
        let operator = FilterOperator::from_name(&operator_name).ok_or_else(|| {
            RuntimeError::InvalidArgument(format!("unknown filter operator '{}'", operator_name))
        })?;

        Ok(Self {
            table_name: read_string("tableName")?,
            field_name: read_string("fieldName")?,
            operator,
            value: map.get("value").cloned().unwrap_or(Value::Null),
        })
    }

    /// Test a row against this filter.
    ///
    /// A field missing from the row reads as null.
    pub fn matches(&self, row: &HashMap<String, Value>) -> Result<bool> {
        let field = &row.get(&self.field_name).cloned().unwrap_or_default();
        match self.operator {
            FilterOperator::Eq => execute_compare(field, CompareOp::Eq, &self.value),
            FilterOperator::Ne => execute_compare(field, CompareOp::Ne, &self.value),
            FilterOperator::Gt => execute_compare(field, CompareOp::Gt, &self.value),
            FilterOperator::Ge => execute_compare(field, CompareOp::Ge, &self.value),
            FilterOperator::Lt => execute_compare(field, CompareOp::Lt, &self.value),
            FilterOperator::Le => execute_compare(field, CompareOp::Le, &self.value),
            FilterOperator::In => list_contains(field, &self.value),
            FilterOperator::NotIn => list_contains(field, &self.value).map(|found| !found),
            FilterOperator::StartsWith => execute_string_op(field, StringOp::StartsWith, &self.value),
            FilterOperator::EndsWith => execute_string_op(field, StringOp::EndsWith, &self.value),
            FilterOperator::IsEmpty => Ok(field.is_empty_value()),
            FilterOperator::IsNotEmpty => Ok(!field.is_empty_value()),
        }
    }
}

/// Aggregation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregationType {
    /// Parse an aggregation name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(AggregationType::Count),
            "count_distinct" => Some(AggregationType::CountDistinct),
            "sum" => Some(AggregationType::Sum),
            "avg" => Some(AggregationType::Avg),
            "min" => Some(AggregationType::Min),
            "max" => Some(AggregationType::Max),
            _ => None,
        }
    }

    /// Value of the aggregation over an empty set, if defined
    pub fn empty_value(&self) -> Option<Value> {
        match self {
            AggregationType::Count | AggregationType::CountDistinct | AggregationType::Sum => {
                Some(Value::Number(0.0))
            }
            AggregationType::Avg | AggregationType::Min | AggregationType::Max => None,
        }
    }
}

/// Request for a single field reached through link-to-single relations
#[derive(Debug, Clone)]
pub struct ReadFieldRequest {
    pub organization_id: String,

    /// Object the link path starts from
    pub trigger: Arc<TriggerObject>,

    /// Resolved link path in traversal order (may be empty)
    pub links: Vec<LinkToSingle>,

    /// Field read from the final row
    pub field_name: String,

    /// Filters the final row must satisfy
    pub filters: Vec<Filter>,
}

impl ReadFieldRequest {
    /// Table the link path ends on
    pub fn target_table(&self) -> &str {
        self.links
            .last()
            .map(|link| link.parent_table_name.as_str())
            .unwrap_or(&self.trigger.table_name)
    }
}

/// Rows of the aggregated table that point at one row reached from the
/// trigger object.
#[derive(Debug, Clone)]
pub struct RelatedRows {
    /// Object the link path starts from
    pub trigger: Arc<TriggerObject>,

    /// Resolved link path to the anchor row (may be empty)
    pub links: Vec<LinkToSingle>,

    /// Link from the aggregated table to the anchor row's table
    pub back_link: LinkToSingle,
}

impl RelatedRows {
    /// Table the anchor row lives in
    pub fn anchor_table(&self) -> &str {
        self.links
            .last()
            .map(|link| link.parent_table_name.as_str())
            .unwrap_or(&self.trigger.table_name)
    }
}

/// Request for an aggregation over one table
#[derive(Debug, Clone)]
pub struct AggregateRequest {
    pub organization_id: String,
    pub table_name: String,
    pub field_name: String,
    pub aggregation: AggregationType,
    pub filters: Vec<Filter>,

    /// Restricts the rows to those linked to the anchor row
    pub related: Option<RelatedRows>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_filter_value_round_trip() {
        let filter = Filter::new("transactions", "account_id", FilterOperator::Eq, "acc-1");
        let decoded = Filter::from_value(&filter.to_value()).unwrap();
        assert_eq!(decoded, filter);
    }

    #[test]
    fn test_filter_from_value_rejects_unknown_operator() {
        let mut map = HashMap::new();
        map.insert("tableName".to_string(), Value::from("t"));
        map.insert("fieldName".to_string(), Value::from("f"));
        map.insert("operator".to_string(), Value::from("like"));
        let err = Filter::from_value(&Value::Object(map)).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidArgument(_)));

        assert!(Filter::from_value(&Value::from("eq")).is_err());
    }

    #[test]
    fn test_filter_matches() {
        let r = row(&[
            ("amount", Value::Number(150.0)),
            ("country", Value::from("FR")),
            ("note", Value::from("")),
        ]);

        assert!(Filter::new("t", "amount", FilterOperator::Gt, 100.0).matches(&r).unwrap());
        assert!(!Filter::new("t", "amount", FilterOperator::Lt, 100.0).matches(&r).unwrap());
        assert!(Filter::new(
            "t",
            "country",
            FilterOperator::In,
            Value::Array(vec![Value::from("FR"), Value::from("DE")])
        )
        .matches(&r)
        .unwrap());
        assert!(Filter::new("t", "note", FilterOperator::IsEmpty, Value::Null).matches(&r).unwrap());
        assert!(Filter::new("t", "missing", FilterOperator::IsEmpty, Value::Null).matches(&r).unwrap());
        assert!(!Filter::new("t", "missing", FilterOperator::Eq, 1.0).matches(&r).unwrap());
    }

    #[test]
    fn test_aggregation_names() {
        assert_eq!(AggregationType::from_name("AVG"), Some(AggregationType::Avg));
        assert_eq!(
            AggregationType::from_name("count_distinct"),
            Some(AggregationType::CountDistinct)
        );
        assert_eq!(AggregationType::from_name("median"), None);
        assert_eq!(AggregationType::Sum.empty_value(), Some(Value::Number(0.0)));
        assert_eq!(AggregationType::Max.empty_value(), None);
    }
}
