//! Dry-run validation of a scenario iteration
//!
//! Every tree is evaluated in fake-value mode: no data store read happens,
//! so only structural problems surface (unknown functions, malformed nodes,
//! type errors, references the data model cannot resolve).

use super::executor::ScenarioEvaluator;
use crate::context::{EvaluationContext, EvaluationOptions};
use crate::engine::EvaluationEnvironment;
use crate::error::RuntimeError;
use serde::Serialize;
use std::sync::Arc;
use verdict_core::{DataModel, Node, Scenario, ScenarioIteration, TriggerObject, Value};

/// One problem found while validating an iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// `trigger_condition`, `thresholds`, or the id of the rule at fault
    pub location: String,
    pub message: String,
}

/// Result of validating an iteration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            location: location.into(),
            message: message.into(),
        });
    }

    /// Issues reported against one location
    pub fn issues_for<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.location == location)
    }
}

impl ScenarioEvaluator {
    /// Validate an iteration against a sample trigger object.
    ///
    /// Unlike [`ScenarioEvaluator::evaluate`] every rule is checked, even
    /// when the trigger condition does not hold for the sample.
    pub async fn validate_iteration(
        &self,
        scenario: &Scenario,
        iteration: &ScenarioIteration,
        trigger: Arc<TriggerObject>,
        data_model: Arc<DataModel>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        if iteration.scenario_id != scenario.id {
            report.push(
                "scenario",
                format!("iteration belongs to scenario '{}'", iteration.scenario_id),
            );
        }
        if trigger.table_name != scenario.trigger_object_type {
            report.push(
                "trigger_object",
                format!(
                    "sample is a '{}' but the scenario triggers on '{}'",
                    trigger.table_name, scenario.trigger_object_type
                ),
            );
        }
        if let Err(e) = iteration.thresholds.validate() {
            report.push("thresholds", e.to_string());
        }
        if data_model.table(&scenario.trigger_object_type).is_none() {
            report.push(
                "trigger_object",
                format!("table '{}' is not in the data model", scenario.trigger_object_type),
            );
        }

        let ctx = EvaluationContext::new(scenario.organization_id.clone(), trigger, data_model)
            .with_options(EvaluationOptions::dry_run());
        let env = self.environments().build();

        if let Some(condition) = &iteration.trigger_condition {
            if let Err(message) = check_tree(&ctx, &env, condition).await {
                report.push("trigger_condition", message);
            }
        }

        for rule in &iteration.rules {
            if let Err(message) = check_tree(&ctx, &env, &rule.formula).await {
                report.push(rule.id.clone(), message);
            }
        }

        tracing::debug!(
            scenario_id = %scenario.id,
            iteration_id = %iteration.id,
            issues = report.issues.len(),
            "iteration validated"
        );
        report
    }
}

/// Check that a tree is well formed and evaluates to a boolean
async fn check_tree(
    ctx: &EvaluationContext,
    env: &EvaluationEnvironment,
    node: &Node,
) -> std::result::Result<(), String> {
    node.validate()
        .map_err(|e| RuntimeError::from(e).to_string())?;

    match env.evaluate(ctx, node).await {
        Ok(Value::Bool(_)) | Ok(Value::Null) => Ok(()),
        Ok(other) => Err(format!("expected a boolean, got {}", other.type_name())),
        Err(error) => Err(error.to_string()),
    }
}
