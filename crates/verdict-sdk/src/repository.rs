//! Scenario repository and decision store contracts
//!
//! The engine reads scenario definitions through [`ScenarioRepository`] and
//! writes decisions through [`DecisionStore`]. In-memory implementations are
//! provided for tests and embedding.

use crate::decision_engine::{Decision, NewCase};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use verdict_core::{DataModel, Scenario, ScenarioIteration};

/// Read access to scenario definitions
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    async fn get_scenario(&self, organization_id: &str, scenario_id: &str) -> Result<Option<Scenario>>;

    async fn get_iteration(
        &self,
        scenario_id: &str,
        iteration_id: &str,
    ) -> Result<Option<ScenarioIteration>>;

    async fn get_data_model(&self, organization_id: &str) -> Result<Option<Arc<DataModel>>>;
}

/// Persistence of decisions.
///
/// A decision and the case it opens are written in one call; implementations
/// must store both or neither.
#[async_trait]
pub trait DecisionStore: Send + Sync {
    async fn store_decision(&self, decision: &Decision, case: Option<&NewCase>) -> Result<()>;
}

/// In-memory scenario repository
#[derive(Default)]
pub struct MemoryScenarioRepository {
    scenarios: RwLock<HashMap<(String, String), Scenario>>,
    iterations: RwLock<HashMap<(String, String), ScenarioIteration>>,
    data_models: RwLock<HashMap<String, Arc<DataModel>>>,
}

impl MemoryScenarioRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario (builder style)
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        let key = (scenario.organization_id.clone(), scenario.id.clone());
        self.scenarios.get_mut().insert(key, scenario);
        self
    }

    /// Add an iteration (builder style)
    pub fn with_iteration(mut self, iteration: ScenarioIteration) -> Self {
        let key = (iteration.scenario_id.clone(), iteration.id.clone());
        self.iterations.get_mut().insert(key, iteration);
        self
    }

    /// Set an organization's data model (builder style)
    pub fn with_data_model(mut self, organization_id: impl Into<String>, data_model: DataModel) -> Self {
        self.data_models
            .get_mut()
            .insert(organization_id.into(), Arc::new(data_model));
        self
    }

    /// Insert or replace a scenario
    pub async fn save_scenario(&self, scenario: Scenario) {
        let key = (scenario.organization_id.clone(), scenario.id.clone());
        self.scenarios.write().await.insert(key, scenario);
    }

    /// Insert or replace an iteration
    pub async fn save_iteration(&self, iteration: ScenarioIteration) {
        let key = (iteration.scenario_id.clone(), iteration.id.clone());
        self.iterations.write().await.insert(key, iteration);
    }
}

#[async_trait]
impl ScenarioRepository for MemoryScenarioRepository {
    async fn get_scenario(&self, organization_id: &str, scenario_id: &str) -> Result<Option<Scenario>> {
        let key = (organization_id.to_string(), scenario_id.to_string());
        Ok(self.scenarios.read().await.get(&key).cloned())
    }

    async fn get_iteration(
        &self,
        scenario_id: &str,
        iteration_id: &str,
    ) -> Result<Option<ScenarioIteration>> {
        let key = (scenario_id.to_string(), iteration_id.to_string());
        Ok(self.iterations.read().await.get(&key).cloned())
    }

    async fn get_data_model(&self, organization_id: &str) -> Result<Option<Arc<DataModel>>> {
        Ok(self.data_models.read().await.get(organization_id).cloned())
    }
}

/// In-memory decision store
#[derive(Default)]
pub struct MemoryDecisionStore {
    inner: RwLock<StoredDecisions>,
}

#[derive(Default)]
struct StoredDecisions {
    decisions: Vec<Decision>,
    cases: Vec<NewCase>,
}

impl MemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored decisions, oldest first
    pub async fn decisions(&self) -> Vec<Decision> {
        self.inner.read().await.decisions.clone()
    }

    /// All opened cases, oldest first
    pub async fn cases(&self) -> Vec<NewCase> {
        self.inner.read().await.cases.clone()
    }
}

#[async_trait]
impl DecisionStore for MemoryDecisionStore {
    async fn store_decision(&self, decision: &Decision, case: Option<&NewCase>) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.decisions.push(decision.clone());
        if let Some(case) = case {
            inner.cases.push(case.clone());
        }
        Ok(())
    }
}
