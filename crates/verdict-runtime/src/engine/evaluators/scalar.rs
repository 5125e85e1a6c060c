//! Pure scalar evaluators
//!
//! Arithmetic, comparison, boolean logic, lists and string predicates. None
//! of these touch a data store; they evaluate their children through the
//! environment and apply the shared operator semantics.

use crate::context::EvaluationContext;
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::engine::operators::{
    concat, execute_arithmetic, execute_compare, execute_string_op, list_contains, ArithmeticOp,
    CompareOp, StringOp,
};
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use verdict_core::{Node, Value};

/// `+ - * /`
pub struct ArithmeticEvaluator {
    op: ArithmeticOp,
}

impl ArithmeticEvaluator {
    pub(crate) fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl Evaluator for ArithmeticEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 2).await?;
        execute_arithmetic(&args[0], self.op, &args[1])
    }
}

/// `> >= < <= = !=`
pub struct ComparisonEvaluator {
    op: CompareOp,
}

impl ComparisonEvaluator {
    pub(crate) fn new(op: CompareOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl Evaluator for ComparisonEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 2).await?;
        execute_compare(&args[0], self.op, &args[1]).map(Value::Bool)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicOp {
    And,
    Or,
}

/// `And` / `Or` over any number of children.
///
/// Null children count as false. With short-circuiting enabled evaluation
/// stops at the first deciding child.
pub struct LogicEvaluator {
    op: LogicOp,
}

impl LogicEvaluator {
    pub(crate) fn new(op: LogicOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl Evaluator for LogicEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        // And is decided by the first false, Or by the first true
        let deciding = self.op == LogicOp::Or;
        let mut decided = false;

        for child in &node.children {
            let value = match env.evaluate(ctx, child).await? {
                Value::Bool(b) => b,
                Value::Null => false,
                other => {
                    return Err(RuntimeError::TypeError(format!(
                        "{} expects booleans, got {}",
                        node.function,
                        other.type_name()
                    )))
                }
            };

            if value == deciding {
                decided = true;
                if ctx.options.short_circuit {
                    break;
                }
            }
        }

        Ok(Value::Bool(if decided { deciding } else { !deciding }))
    }
}

/// `Not`
pub struct NotEvaluator;

#[async_trait]
impl Evaluator for NotEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 1).await?;
        match &args[0] {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Null => Ok(Value::Null),
            other => Err(RuntimeError::TypeError(format!(
                "Not expects a boolean, got {}",
                other.type_name()
            ))),
        }
    }
}

/// `List`: collects its children into an array
pub struct ListEvaluator;

#[async_trait]
impl Evaluator for ListEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        Ok(Value::Array(env.evaluate_children(ctx, node).await?))
    }
}

/// `IsInList` / `IsNotInList`: first child is the value, second the list
pub struct MembershipEvaluator {
    negate: bool,
}

impl MembershipEvaluator {
    pub(crate) fn new(negate: bool) -> Self {
        Self { negate }
    }
}

#[async_trait]
impl Evaluator for MembershipEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 2).await?;
        if args[0].is_null() {
            return Ok(Value::Bool(false));
        }
        let found = list_contains(&args[0], &args[1])?;
        Ok(Value::Bool(found != self.negate))
    }
}

/// `StringContains`, `StringNotContains`, `StringStartsWith`, `StringEndsWith`
pub struct StringPredicateEvaluator {
    op: StringOp,
    negate: bool,
}

impl StringPredicateEvaluator {
    pub(crate) fn new(op: StringOp, negate: bool) -> Self {
        Self { op, negate }
    }
}

#[async_trait]
impl Evaluator for StringPredicateEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 2).await?;
        if args[0].is_null() || args[1].is_null() {
            return Ok(Value::Bool(false));
        }
        let matched = execute_string_op(&args[0], self.op, &args[1])?;
        Ok(Value::Bool(matched != self.negate))
    }
}

/// `IsEmpty` / `IsNotEmpty`
pub struct EmptinessEvaluator {
    negate: bool,
}

impl EmptinessEvaluator {
    pub(crate) fn new(negate: bool) -> Self {
        Self { negate }
    }
}

#[async_trait]
impl Evaluator for EmptinessEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let args = env.evaluate_exact_children(ctx, node, 1).await?;
        Ok(Value::Bool(args[0].is_empty_value() != self.negate))
    }
}

/// `StringConcat`: joins its children, skipping nulls.
///
/// An optional constant `separator` named child defaults to the empty string.
pub struct StringConcatEvaluator;

#[async_trait]
impl Evaluator for StringConcatEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let separator = node
            .read_optional_constant_named_child_string("separator")?
            .unwrap_or("");
        let values = env.evaluate_children(ctx, node).await?;
        Ok(Value::String(concat(&values, separator)))
    }
}
