//! Scenario executor

use super::state::EvaluationState;
use crate::context::{CancellationFlag, EvaluationContext, EvaluationOptions};
use crate::engine::{EnvironmentFactory, EvaluationEnvironment};
use crate::error::{Result, RuntimeError};
use crate::observability::{names, Metrics, MetricsCollector};
use crate::result::{RuleExecution, RuleExecutionError, ScenarioExecution};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use verdict_core::{DataModel, Outcome, Rule, Scenario, ScenarioIteration, TriggerObject, Value};

/// Inputs of one scenario evaluation
#[derive(Debug, Clone)]
pub struct ScenarioEvaluationParams<'a> {
    pub scenario: &'a Scenario,

    /// Iteration to evaluate, normally the live one
    pub iteration: Option<&'a ScenarioIteration>,

    pub trigger: Arc<TriggerObject>,
    pub data_model: Arc<DataModel>,
    pub options: EvaluationOptions,
    pub cancellation: CancellationFlag,

    /// Reference time, defaults to the time the evaluation starts
    pub now: Option<DateTime<Utc>>,
}

impl<'a> ScenarioEvaluationParams<'a> {
    pub fn new(
        scenario: &'a Scenario,
        iteration: Option<&'a ScenarioIteration>,
        trigger: Arc<TriggerObject>,
        data_model: Arc<DataModel>,
    ) -> Self {
        Self {
            scenario,
            iteration,
            trigger,
            data_model,
            options: EvaluationOptions::default(),
            cancellation: CancellationFlag::new(),
            now: None,
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// Evaluates scenarios against trigger objects.
///
/// Cheap to share: every evaluation builds its own environment and context,
/// so concurrent evaluations never share mutable state.
pub struct ScenarioEvaluator {
    environments: EnvironmentFactory,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ScenarioEvaluator {
    /// Create a new scenario evaluator
    pub fn new(environments: EnvironmentFactory) -> Self {
        Self {
            environments,
            metrics: None,
        }
    }

    /// Record metrics into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn environments(&self) -> &EnvironmentFactory {
        &self.environments
    }

    pub fn metrics(&self) -> Option<&Arc<MetricsCollector>> {
        self.metrics.as_ref()
    }

    pub(crate) fn count(&self, name: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.counter(name).inc();
        }
    }

    /// Evaluate a scenario.
    ///
    /// A trigger condition that does not hold is not an error: the result
    /// carries [`Outcome::TriggerConditionNotMet`] and no rule executions.
    /// A panic raised anywhere inside the evaluation is caught here and
    /// returned as [`RuntimeError::EvaluationPanicked`].
    pub async fn evaluate(&self, params: ScenarioEvaluationParams<'_>) -> Result<ScenarioExecution> {
        let started = Instant::now();
        let scenario_id = params.scenario.id.clone();
        let organization_id = params.scenario.organization_id.clone();
        let mut state = EvaluationState::NotStarted;

        self.count(names::SCENARIO_EVALUATIONS);
        tracing::debug!(
            scenario_id = %scenario_id,
            organization_id = %organization_id,
            trigger_table = %params.trigger.table_name,
            "evaluating scenario"
        );

        let outcome = AssertUnwindSafe(self.run(&params, &mut state, started))
            .catch_unwind()
            .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_execution_time(names::SCENARIO_EVALUATION, started.elapsed());
        }

        match outcome {
            Ok(Ok(execution)) => {
                tracing::info!(
                    scenario_id = %scenario_id,
                    organization_id = %organization_id,
                    score = execution.score,
                    outcome = %execution.outcome,
                    duration_ms = execution.duration_ms,
                    "scenario evaluated"
                );
                Ok(execution)
            }
            Ok(Err(error)) => {
                state.abort(&scenario_id);
                self.count(names::EVALUATION_FAILURES);
                if error.is_configuration_error() {
                    tracing::warn!(scenario_id = %scenario_id, error = %error, "scenario configuration error");
                } else {
                    tracing::error!(scenario_id = %scenario_id, error = %error, "scenario evaluation failed");
                }
                Err(error)
            }
            Err(payload) => {
                let backtrace = Backtrace::force_capture();
                tracing::error!(
                    scenario_id = %scenario_id,
                    organization_id = %organization_id,
                    state = %state,
                    panic = %panic_message(payload.as_ref()),
                    backtrace = %backtrace,
                    "scenario evaluation panicked"
                );
                state.abort(&scenario_id);
                self.count(names::EVALUATION_PANICS);
                Err(RuntimeError::EvaluationPanicked)
            }
        }
    }

    async fn run(
        &self,
        params: &ScenarioEvaluationParams<'_>,
        state: &mut EvaluationState,
        started: Instant,
    ) -> Result<ScenarioExecution> {
        let scenario = params.scenario;
        let iteration = check_configuration(params)?;

        let ctx = EvaluationContext::new(
            scenario.organization_id.clone(),
            params.trigger.clone(),
            params.data_model.clone(),
        )
        .with_options(params.options)
        .with_cancellation(params.cancellation.clone())
        .with_now(params.now.unwrap_or_else(Utc::now));
        let env = self.environments.build();

        ctx.check_cancelled()?;
        let triggered = self.evaluate_trigger(&ctx, &env, iteration).await?;
        state.advance(EvaluationState::TriggerEvaluated, &scenario.id);

        let assemble = |score: i32, outcome: Outcome, rule_executions: Vec<RuleExecution>| {
            ScenarioExecution {
                scenario_id: scenario.id.clone(),
                scenario_name: scenario.name.clone(),
                scenario_iteration_id: iteration.id.clone(),
                scenario_version: iteration.version,
                organization_id: scenario.organization_id.clone(),
                trigger_object_table: params.trigger.table_name.clone(),
                score,
                outcome,
                rule_executions,
                evaluated_at: ctx.now,
                duration_ms: started.elapsed().as_millis() as u64,
            }
        };

        if !triggered {
            tracing::debug!(scenario_id = %scenario.id, "trigger condition not met");
            self.count(names::TRIGGER_NOT_MET);
            return Ok(assemble(0, Outcome::TriggerConditionNotMet, Vec::new()));
        }

        let mut score: i32 = 0;
        let mut rule_executions = Vec::with_capacity(iteration.rules.len());
        for rule in &iteration.rules {
            ctx.check_cancelled()?;
            let execution = self.evaluate_rule(&ctx, &env, rule).await?;
            score = score.saturating_add(execution.score_modifier);
            rule_executions.push(execution);
        }
        state.advance(EvaluationState::RulesEvaluated, &scenario.id);

        let outcome = iteration.thresholds.outcome_for(score);
        state.advance(EvaluationState::ScoredAndOutcomeAssigned, &scenario.id);

        Ok(assemble(score, outcome, rule_executions))
    }

    async fn evaluate_trigger(
        &self,
        ctx: &EvaluationContext,
        env: &EvaluationEnvironment,
        iteration: &ScenarioIteration,
    ) -> Result<bool> {
        let condition = match &iteration.trigger_condition {
            Some(condition) => condition,
            None => return Ok(true),
        };

        match env.evaluate(ctx, condition).await {
            Ok(Value::Bool(met)) => Ok(met),
            Ok(Value::Null) => Ok(false),
            Ok(other) => Err(RuntimeError::TriggerConditionFailed(Box::new(
                RuntimeError::TypeError(format!(
                    "trigger condition must be a boolean, got {}",
                    other.type_name()
                )),
            ))),
            Err(error) => match RuleExecutionError::classify(&error) {
                // Missing data means the condition cannot hold
                Some(kind) => {
                    tracing::debug!(error = %error, kind = kind.as_str(), "trigger condition not evaluable");
                    Ok(false)
                }
                None => Err(RuntimeError::TriggerConditionFailed(Box::new(error))),
            },
        }
    }

    async fn evaluate_rule(
        &self,
        ctx: &EvaluationContext,
        env: &EvaluationEnvironment,
        rule: &Rule,
    ) -> Result<RuleExecution> {
        let fail = |source: RuntimeError| RuntimeError::RuleFailed {
            rule_id: rule.id.clone(),
            source: Box::new(source),
        };

        match env.evaluate(ctx, &rule.formula).await {
            Ok(Value::Bool(result)) => {
                tracing::debug!(rule_id = %rule.id, result, "rule evaluated");
                Ok(RuleExecution::success(rule, result))
            }
            Ok(Value::Null) => Ok(RuleExecution::success(rule, false)),
            Ok(other) => Err(fail(RuntimeError::TypeError(format!(
                "rule formula must be a boolean, got {}",
                other.type_name()
            )))),
            Err(error) => match RuleExecutionError::classify(&error) {
                Some(kind) => {
                    tracing::warn!(
                        rule_id = %rule.id,
                        organization_id = %ctx.organization_id,
                        kind = kind.as_str(),
                        error = %error,
                        "rule evaluation error"
                    );
                    self.count(names::RULE_ERRORS);
                    Ok(RuleExecution::failed(rule, kind, error.to_string()))
                }
                None => Err(fail(error)),
            },
        }
    }
}

/// Reject configuration errors before anything is evaluated
fn check_configuration<'a>(params: &ScenarioEvaluationParams<'a>) -> Result<&'a ScenarioIteration> {
    let scenario = params.scenario;
    let iteration = params
        .iteration
        .ok_or_else(|| RuntimeError::NoLiveIteration(scenario.id.clone()))?;

    if iteration.scenario_id != scenario.id {
        return Err(RuntimeError::InvalidConfiguration(format!(
            "iteration '{}' belongs to scenario '{}', not '{}'",
            iteration.id, iteration.scenario_id, scenario.id
        )));
    }

    if params.trigger.table_name != scenario.trigger_object_type {
        return Err(RuntimeError::TriggerTableMismatch {
            expected: scenario.trigger_object_type.clone(),
            actual: params.trigger.table_name.clone(),
        });
    }

    iteration
        .thresholds
        .validate()
        .map_err(|e| RuntimeError::InvalidConfiguration(e.to_string()))?;

    Ok(iteration)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
