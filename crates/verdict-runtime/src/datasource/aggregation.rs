//! Aggregation over already-filtered field values

use super::query::AggregationType;
use crate::error::{Result, RuntimeError};
use std::collections::HashSet;
use verdict_core::Value;

/// Reduce the field values of the matching rows.
///
/// `values` holds one entry per matching row, null where the row has no
/// value. `count` counts rows; the other aggregations ignore nulls.
/// Returns `None` for an empty set without a defined default.
pub fn aggregate_values(aggregation: AggregationType, values: &[Value]) -> Result<Option<Value>> {
    match aggregation {
        AggregationType::Count => return Ok(Some(Value::Number(values.len() as f64))),
        AggregationType::CountDistinct => {
            let distinct: HashSet<String> = values
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| format!("{}:{}", v.type_name(), v))
                .collect();
            return Ok(Some(Value::Number(distinct.len() as f64)));
        }
        _ => {}
    }

    let numbers = values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| {
            v.as_number().ok_or_else(|| {
                RuntimeError::TypeError(format!(
                    "cannot aggregate {:?} over {} values",
                    aggregation,
                    v.type_name()
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if numbers.is_empty() {
        return Ok(aggregation.empty_value());
    }

    let result = match aggregation {
        AggregationType::Sum => numbers.iter().sum(),
        AggregationType::Avg => numbers.iter().sum::<f64>() / numbers.len() as f64,
        AggregationType::Min => numbers.iter().cloned().fold(f64::INFINITY, f64::min),
        AggregationType::Max => numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        AggregationType::Count | AggregationType::CountDistinct => numbers.len() as f64,
    };

    Ok(Some(Value::Number(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|n| Value::Number(*n)).collect()
    }

    #[test]
    fn test_numeric_aggregations() {
        let values = numbers(&[10.0, 20.0, 30.0]);
        assert_eq!(aggregate_values(AggregationType::Sum, &values).unwrap(), Some(Value::Number(60.0)));
        assert_eq!(aggregate_values(AggregationType::Avg, &values).unwrap(), Some(Value::Number(20.0)));
        assert_eq!(aggregate_values(AggregationType::Min, &values).unwrap(), Some(Value::Number(10.0)));
        assert_eq!(aggregate_values(AggregationType::Max, &values).unwrap(), Some(Value::Number(30.0)));
    }

    #[test]
    fn test_count_counts_rows_and_distinct_ignores_nulls() {
        let values = vec![Value::from("a"), Value::from("a"), Value::Null, Value::from("b")];
        assert_eq!(aggregate_values(AggregationType::Count, &values).unwrap(), Some(Value::Number(4.0)));
        assert_eq!(
            aggregate_values(AggregationType::CountDistinct, &values).unwrap(),
            Some(Value::Number(2.0))
        );
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(aggregate_values(AggregationType::Count, &[]).unwrap(), Some(Value::Number(0.0)));
        assert_eq!(aggregate_values(AggregationType::Sum, &[]).unwrap(), Some(Value::Number(0.0)));
        assert_eq!(aggregate_values(AggregationType::Avg, &[]).unwrap(), None);
        assert_eq!(aggregate_values(AggregationType::Max, &[Value::Null]).unwrap(), None);
    }

    #[test]
    fn test_non_numeric_sum_fails() {
        let err = aggregate_values(AggregationType::Sum, &[Value::from("x")]).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError(_)));
    }
}
