//! Builder pattern for DecisionEngine

use crate::config::EngineConfig;
use crate::decision_engine::DecisionEngine;
use crate::error::Result;
use crate::repository::{DecisionStore, MemoryDecisionStore, MemoryScenarioRepository, ScenarioRepository};
use std::sync::Arc;
use verdict_core::Function;
use verdict_runtime::{
    DataAccessor, EnvironmentFactory, Evaluator, InMemoryDataStore, ListService, MetricsCollector,
    ScenarioEvaluator,
};

/// Builder for DecisionEngine
///
/// # Example
///
/// ```rust,ignore
/// use verdict_sdk::{DecisionEngineBuilder, EngineConfig, MemoryScenarioRepository};
///
/// let engine = DecisionEngineBuilder::new()
///     .with_config(EngineConfig::load("config/engine.yaml")?)
///     .with_scenario_repository(Arc::new(repository))
///     .with_data_accessor(Arc::new(store))
///     .build()?;
/// ```
///
/// Every collaborator that is not provided falls back to an empty
/// in-memory implementation.
pub struct DecisionEngineBuilder {
    config: EngineConfig,
    data_accessor: Option<Arc<dyn DataAccessor>>,
    list_service: Option<Arc<ListService>>,
    scenarios: Option<Arc<dyn ScenarioRepository>>,
    decisions: Option<Arc<dyn DecisionStore>>,
    evaluators: Vec<(Function, Arc<dyn Evaluator>)>,
}

impl DecisionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            data_accessor: None,
            list_service: None,
            scenarios: None,
            decisions: None,
            evaluators: Vec::new(),
        }
    }

    // ========== Configuration ==========

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Set the batch concurrency
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.config.batch_concurrency = concurrency;
        self
    }

    // ========== Collaborators ==========

    /// Set the data accessor backing `DatabaseAccess` and `Aggregator`
    pub fn with_data_accessor(mut self, data_accessor: Arc<dyn DataAccessor>) -> Self {
        self.data_accessor = Some(data_accessor);
        self
    }

    /// Set the custom list service
    pub fn with_list_service(mut self, list_service: Arc<ListService>) -> Self {
        self.list_service = Some(list_service);
        self
    }

    /// Set the scenario repository
    pub fn with_scenario_repository(mut self, scenarios: Arc<dyn ScenarioRepository>) -> Self {
        self.scenarios = Some(scenarios);
        self
    }

    /// Set the decision store
    pub fn with_decision_store(mut self, decisions: Arc<dyn DecisionStore>) -> Self {
        self.decisions = Some(decisions);
        self
    }

    /// Register an evaluator for a custom function.
    ///
    /// # Panics
    ///
    /// [`DecisionEngineBuilder::build`] panics when the function already has
    /// an evaluator.
    pub fn with_evaluator(mut self, function: Function, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluators.push((function, evaluator));
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<DecisionEngine> {
        self.config.validate()?;

        let data_accessor = self
            .data_accessor
            .unwrap_or_else(|| Arc::new(InMemoryDataStore::new()));
        let list_service = self.list_service.unwrap_or_else(|| Arc::new(ListService::new()));

        let factory = self
            .evaluators
            .into_iter()
            .fold(EnvironmentFactory::new(data_accessor, list_service), |factory, (function, evaluator)| {
                factory.with_evaluator(function, evaluator)
            });
        // Registration conflicts surface here rather than on the first decision
        factory.build();

        let mut evaluator = ScenarioEvaluator::new(factory);
        if self.config.enable_metrics {
            evaluator = evaluator.with_metrics(Arc::new(MetricsCollector::new()));
        }

        let scenarios = self
            .scenarios
            .unwrap_or_else(|| Arc::new(MemoryScenarioRepository::new()));
        let decisions = self
            .decisions
            .unwrap_or_else(|| Arc::new(MemoryDecisionStore::new()));

        tracing::debug!(
            enable_metrics = self.config.enable_metrics,
            batch_concurrency = self.config.batch_concurrency,
            "decision engine built"
        );
        Ok(DecisionEngine::new(evaluator, scenarios, decisions, self.config))
    }
}

impl Default for DecisionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
