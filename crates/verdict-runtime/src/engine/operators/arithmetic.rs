//! Arithmetic operator execution

use crate::error::{Result, RuntimeError};
use verdict_core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Execute an arithmetic operation
pub(crate) fn execute_arithmetic(left: &Value, op: ArithmeticOp, right: &Value) -> Result<Value> {
    // Null in any operand propagates
    if left.is_null() || right.is_null() {
        tracing::debug!(?left, ?op, ?right, "null operand in arithmetic, returning null");
        return Ok(Value::Null);
    }

    let (l, r) = match (left, right) {
        (Value::Number(l), Value::Number(r)) => (*l, *r),
        _ => {
            return Err(RuntimeError::TypeError(format!(
                "cannot apply {:?} to {} and {}",
                op,
                left.type_name(),
                right.type_name()
            )))
        }
    };

    let result = match op {
        ArithmeticOp::Add => l + r,
        ArithmeticOp::Sub => l - r,
        ArithmeticOp::Mul => l * r,
        ArithmeticOp::Div => {
            if r == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            l / r
        }
    };

    Ok(Value::Number(result))
}
