//! String operator execution

use crate::error::{Result, RuntimeError};
use verdict_core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringOp {
    Contains,
    StartsWith,
    EndsWith,
}

/// Execute a string predicate, case-insensitively.
///
/// A null operand yields `false`.
pub(crate) fn execute_string_op(left: &Value, op: StringOp, right: &Value) -> Result<bool> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }

    let (haystack, needle) = match (left, right) {
        (Value::String(l), Value::String(r)) => (l.to_lowercase(), r.to_lowercase()),
        _ => {
            return Err(RuntimeError::TypeError(format!(
                "{:?} expects two strings, got {} and {}",
                op,
                left.type_name(),
                right.type_name()
            )))
        }
    };

    Ok(match op {
        StringOp::Contains => haystack.contains(&needle),
        StringOp::StartsWith => haystack.starts_with(&needle),
        StringOp::EndsWith => haystack.ends_with(&needle),
    })
}

/// Concatenate the display form of each value, skipping nulls
pub(crate) fn concat(values: &[Value], separator: &str) -> String {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Membership of `value` in `list`.
///
/// String membership ignores case. A null value is never a member.
pub(crate) fn list_contains(value: &Value, list: &Value) -> Result<bool> {
    let items = match list {
        Value::Array(items) => items,
        Value::Null => return Ok(false),
        other => {
            return Err(RuntimeError::TypeError(format!(
                "expected a list, got {}",
                other.type_name()
            )))
        }
    };
    if value.is_null() {
        return Ok(false);
    }

    Ok(items.iter().any(|item| match (item, value) {
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        _ => item == value,
    }))
}
