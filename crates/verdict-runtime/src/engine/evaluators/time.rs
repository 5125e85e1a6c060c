//! Time evaluators

use crate::context::EvaluationContext;
use crate::engine::environment::EvaluationEnvironment;
use crate::engine::evaluator::Evaluator;
use crate::engine::operators::{timestamp_to_value, value_to_timestamp, RelativeDuration, TimestampPart};
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use verdict_core::{Node, Value};

/// `TimeNow`: the evaluation's reference time
pub struct TimeNowEvaluator;

#[async_trait]
impl Evaluator for TimeNowEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        _node: &Node,
        _env: &EvaluationEnvironment,
    ) -> Result<Value> {
        Ok(timestamp_to_value(ctx.now))
    }
}

/// `TimeAdd`: shifts `timestampField` by `duration` (e.g. `24h`).
///
/// `sign` is `+` (default) or `-`. A null timestamp yields null.
pub struct TimeAddEvaluator;

#[async_trait]
impl Evaluator for TimeAddEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let sign = node
            .read_optional_constant_named_child_string("sign")?
            .unwrap_or("+");
        let timestamp = env.evaluate_named_child(ctx, node, "timestampField").await?;
        let duration = env.evaluate_named_child(ctx, node, "duration").await?;

        if timestamp.is_null() {
            return Ok(Value::Null);
        }

        let relative = duration
            .as_str()
            .and_then(RelativeDuration::from_string)
            .ok_or_else(|| RuntimeError::InvalidArgument(format!("invalid duration '{}'", duration)))?;
        let out_of_range =
            || RuntimeError::InvalidArgument(format!("duration '{}' is out of range", duration));
        let delta = relative.to_duration().ok_or_else(out_of_range)?;
        let timestamp = value_to_timestamp(&timestamp)?;

        let shifted = match sign {
            "+" => timestamp.checked_add_signed(delta),
            "-" => timestamp.checked_sub_signed(delta),
            other => {
                return Err(RuntimeError::InvalidArgument(format!(
                    "sign must be '+' or '-', got '{}'",
                    other
                )))
            }
        };

        shifted.map(timestamp_to_value).ok_or_else(out_of_range)
    }
}

/// `TimestampExtract`: one calendar part of `timestamp`, as a number
pub struct TimestampExtractEvaluator;

#[async_trait]
impl Evaluator for TimestampExtractEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext,
        node: &Node,
        env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let part_name = node.read_constant_named_child_string("part")?;
        let part = TimestampPart::from_name(part_name).ok_or_else(|| {
            RuntimeError::InvalidArgument(format!("unknown timestamp part '{}'", part_name))
        })?;

        let timestamp = env.evaluate_named_child(ctx, node, "timestamp").await?;
        if timestamp.is_null() {
            return Ok(Value::Null);
        }

        let timestamp = value_to_timestamp(&timestamp)?;
        Ok(Value::Number(part.extract(&timestamp) as f64))
    }
}
