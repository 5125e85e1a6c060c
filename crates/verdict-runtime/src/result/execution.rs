//! Execution result types

use crate::error::RuntimeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use verdict_core::{Outcome, Rule};

/// Rule-local error kinds.
///
/// These are recorded on the rule execution; the scenario keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleExecutionError {
    NullFieldRead,
    PayloadFieldNotFound,
    NoRowsRead,
    DivisionByZero,
}

impl RuleExecutionError {
    /// Classify an evaluation error, `None` when the error is fatal
    pub fn classify(error: &RuntimeError) -> Option<Self> {
        match error {
            RuntimeError::NullFieldRead(_) => Some(RuleExecutionError::NullFieldRead),
            RuntimeError::PayloadFieldNotFound(_) => Some(RuleExecutionError::PayloadFieldNotFound),
            RuntimeError::NoRowsRead(_) => Some(RuleExecutionError::NoRowsRead),
            RuntimeError::DivisionByZero => Some(RuleExecutionError::DivisionByZero),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleExecutionError::NullFieldRead => "null_field_read",
            RuleExecutionError::PayloadFieldNotFound => "payload_field_not_found",
            RuleExecutionError::NoRowsRead => "no_rows_read",
            RuleExecutionError::DivisionByZero => "division_by_zero",
        }
    }
}

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleExecution {
    pub rule_id: String,
    pub rule_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_group: Option<String>,

    /// Whether the formula evaluated to true
    pub result: bool,

    /// Score added to the scenario total (0 unless `result`)
    pub score_modifier: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RuleExecutionError>,

    /// Message of the recovered error, for audit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RuleExecution {
    /// Create a successful rule execution
    pub fn success(rule: &Rule, result: bool) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_group: rule.rule_group.clone(),
            result,
            score_modifier: if result { rule.score_modifier } else { 0 },
            error: None,
            error_message: None,
        }
    }

    /// Create a rule execution that recovered from a rule-local error
    pub fn failed(rule: &Rule, error: RuleExecutionError, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_group: rule.rule_group.clone(),
            result: false,
            score_modifier: 0,
            error: Some(error),
            error_message: Some(message.into()),
        }
    }
}

/// Result of evaluating one scenario against one trigger object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioExecution {
    pub scenario_id: String,
    pub scenario_name: String,
    pub scenario_iteration_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_version: Option<u32>,

    pub organization_id: String,
    pub trigger_object_table: String,

    /// Total score
    pub score: i32,

    pub outcome: Outcome,

    /// Rule executions in declaration order, empty when the trigger was not met
    #[serde(default)]
    pub rule_executions: Vec<RuleExecution>,

    pub evaluated_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ScenarioExecution {
    /// Whether the trigger condition held and an outcome was assigned
    pub fn is_triggered(&self) -> bool {
        self.outcome.is_decision()
    }

    /// Rules that evaluated to true
    pub fn triggered_rules(&self) -> impl Iterator<Item = &RuleExecution> {
        self.rule_executions.iter().filter(|r| r.result)
    }

    /// Rules that recovered from a rule-local error
    pub fn rule_errors(&self) -> impl Iterator<Item = &RuleExecution> {
        self.rule_executions.iter().filter(|r| r.error.is_some())
    }
}
