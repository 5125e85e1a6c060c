//! Core DecisionEngine implementation

use super::types::{Decision, DecisionRequest, NewCase};
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::repository::{DecisionStore, ScenarioRepository};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};
use verdict_core::{DataModel, Outcome, Scenario, ScenarioIteration, TriggerObject};
use verdict_runtime::{
    MetricsCollector, ScenarioEvaluationParams, ScenarioEvaluator, ScenarioExecution,
    ValidationReport,
};

/// Main decision engine
pub struct DecisionEngine {
    evaluator: ScenarioEvaluator,
    scenarios: Arc<dyn ScenarioRepository>,
    decisions: Arc<dyn DecisionStore>,
    config: EngineConfig,
}

impl DecisionEngine {
    pub(crate) fn new(
        evaluator: ScenarioEvaluator,
        scenarios: Arc<dyn ScenarioRepository>,
        decisions: Arc<dyn DecisionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            evaluator,
            scenarios,
            decisions,
            config,
        }
    }

    /// Evaluate the scenario's live iteration and persist the decision.
    ///
    /// Returns `Ok(None)` when the trigger condition does not hold; nothing
    /// is persisted in that case. A decision whose outcome is listed in the
    /// scenario's `case_outcomes` is stored together with a new case.
    pub async fn decide(&self, request: DecisionRequest) -> Result<Option<Decision>> {
        let scenario = self.load_scenario(&request).await?;
        let iteration = match scenario.live_iteration_id.as_deref() {
            Some(iteration_id) => Some(self.load_iteration(&scenario.id, iteration_id).await?),
            // Reported by the evaluator as a configuration error
            None => None,
        };
        let data_model = self.load_data_model(&request.organization_id).await?;

        let trigger = Arc::new(request.trigger);
        let params = ScenarioEvaluationParams::new(&scenario, iteration.as_ref(), trigger.clone(), data_model)
            .with_options(self.config.evaluation_options())
            .with_cancellation(request.cancellation);
        let execution = self.evaluator.evaluate(params).await?;

        if execution.outcome == Outcome::TriggerConditionNotMet {
            debug!(scenario_id = %scenario.id, "no decision: trigger condition not met");
            return Ok(None);
        }

        let mut decision = Decision::from_execution(execution, &trigger);
        let case = scenario
            .opens_case_for(decision.outcome)
            .then(|| NewCase::for_decision(&decision, &scenario));
        decision.case_id = case.as_ref().map(|case| case.id);

        self.decisions.store_decision(&decision, case.as_ref()).await?;

        info!(
            decision_id = %decision.id,
            scenario_id = %decision.scenario_id,
            organization_id = %decision.organization_id,
            outcome = %decision.outcome,
            score = decision.score,
            case_opened = decision.case_id.is_some(),
            "decision created"
        );
        Ok(Some(decision))
    }

    /// Decide many independent requests concurrently.
    ///
    /// At most `batch_concurrency` evaluations run at once. Results are
    /// returned in request order, one per request.
    pub async fn decide_batch(&self, requests: Vec<DecisionRequest>) -> Vec<Result<Option<Decision>>> {
        let count = requests.len();
        let results: Vec<_> = stream::iter(requests)
            .map(|request| self.decide(request))
            .buffered(self.config.batch_concurrency.max(1))
            .collect()
            .await;

        debug!(
            requests = count,
            failures = results.iter().filter(|r| r.is_err()).count(),
            "batch decided"
        );
        results
    }

    /// Evaluate a draft iteration against live data without persisting.
    ///
    /// Unlike [`DecisionEngine::decide`] a trigger condition that does not
    /// hold is returned as an execution with
    /// [`Outcome::TriggerConditionNotMet`].
    pub async fn phantom_decide(
        &self,
        request: DecisionRequest,
        iteration: &ScenarioIteration,
    ) -> Result<ScenarioExecution> {
        let scenario = self.load_scenario(&request).await?;
        let data_model = self.load_data_model(&request.organization_id).await?;

        let params = ScenarioEvaluationParams::new(
            &scenario,
            Some(iteration),
            Arc::new(request.trigger),
            data_model,
        )
        .with_options(self.config.evaluation_options())
        .with_cancellation(request.cancellation);

        let execution = self.evaluator.evaluate(params).await?;
        debug!(
            scenario_id = %scenario.id,
            iteration_id = %iteration.id,
            outcome = %execution.outcome,
            "phantom decision evaluated"
        );
        Ok(execution)
    }

    /// Dry-run an iteration in fake-value mode.
    ///
    /// No data store read happens. Unknown functions, malformed nodes and
    /// type errors are reported per rule.
    pub async fn validate_iteration(
        &self,
        scenario: &Scenario,
        iteration: &ScenarioIteration,
        trigger: TriggerObject,
    ) -> Result<ValidationReport> {
        let data_model = self.load_data_model(&scenario.organization_id).await?;
        Ok(self
            .evaluator
            .validate_iteration(scenario, iteration, Arc::new(trigger), data_model)
            .await)
    }

    /// Get metrics collector
    pub fn metrics(&self) -> Option<&Arc<MetricsCollector>> {
        self.evaluator.metrics()
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn load_scenario(&self, request: &DecisionRequest) -> Result<Scenario> {
        self.scenarios
            .get_scenario(&request.organization_id, &request.scenario_id)
            .await?
            .ok_or_else(|| SdkError::ScenarioNotFound(request.scenario_id.clone()))
    }

    async fn load_iteration(&self, scenario_id: &str, iteration_id: &str) -> Result<ScenarioIteration> {
        self.scenarios
            .get_iteration(scenario_id, iteration_id)
            .await?
            .ok_or_else(|| SdkError::IterationNotFound {
                scenario_id: scenario_id.to_string(),
                iteration_id: iteration_id.to_string(),
            })
    }

    async fn load_data_model(&self, organization_id: &str) -> Result<Arc<DataModel>> {
        self.scenarios
            .get_data_model(organization_id)
            .await?
            .ok_or_else(|| SdkError::DataModelNotFound(organization_id.to_string()))
    }
}
