//! Comparison operator execution

use super::time::parse_timestamp;
use crate::error::{Result, RuntimeError};
use std::cmp::Ordering;
use verdict_core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// Execute a comparison operation
pub(crate) fn execute_compare(left: &Value, op: CompareOp, right: &Value) -> Result<bool> {
    // Null compared to anything is false
    if left.is_null() || right.is_null() {
        tracing::debug!(?left, ?op, ?right, "null comparison, returning false");
        return Ok(false);
    }

    match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => values_equal(left, right).map(|eq| !eq),
        CompareOp::Gt => Ok(order_values(left, right)? == Ordering::Greater),
        CompareOp::Ge => Ok(order_values(left, right)? != Ordering::Less),
        CompareOp::Lt => Ok(order_values(left, right)? == Ordering::Less),
        CompareOp::Le => Ok(order_values(left, right)? != Ordering::Greater),
    }
}

/// Equality between two non-null values of the same type.
///
/// Two RFC 3339 strings are equal when they denote the same instant.
pub(crate) fn values_equal(left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(l == r),
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::String(l), Value::String(r)) => {
            if let (Some(l), Some(r)) = (parse_timestamp(l), parse_timestamp(r)) {
                Ok(l == r)
            } else {
                Ok(l == r)
            }
        }
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            Ok(left == right)
        }
        _ => Err(RuntimeError::TypeError(format!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Order two non-null values of the same scalar type
pub(crate) fn order_values(left: &Value, right: &Value) -> Result<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r).ok_or_else(|| {
            RuntimeError::TypeError("cannot order NaN".to_string())
        }),
        (Value::String(l), Value::String(r)) => {
            match (parse_timestamp(l), parse_timestamp(r)) {
                (Some(l), Some(r)) => Ok(l.cmp(&r)),
                _ => Ok(l.cmp(r)),
            }
        }
        _ => Err(RuntimeError::TypeError(format!(
            "cannot order {} and {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}
