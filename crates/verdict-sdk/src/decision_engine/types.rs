//! Request and decision types for DecisionEngine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdict_core::{Outcome, Scenario, TriggerObject};
use verdict_runtime::{CancellationFlag, ScenarioExecution};

/// Decision request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub organization_id: String,

    pub scenario_id: String,

    /// Object the decision is computed for
    pub trigger: TriggerObject,

    /// Cancels the evaluation when raised by the caller
    #[serde(skip)]
    pub cancellation: CancellationFlag,
}

impl DecisionRequest {
    /// Create a new decision request
    pub fn new(
        organization_id: impl Into<String>,
        scenario_id: impl Into<String>,
        trigger: TriggerObject,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            scenario_id: scenario_id.into(),
            trigger,
            cancellation: CancellationFlag::new(),
        }
    }

    /// Attach a cancellation flag
    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// A scenario's verdict on one trigger object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,

    pub organization_id: String,

    pub scenario_id: String,

    pub scenario_iteration_id: String,

    /// `object_id` of the trigger object, when it has one
    pub trigger_object_id: Option<String>,

    pub trigger_object_table: String,

    pub score: i32,

    pub outcome: Outcome,

    /// Case opened for this decision
    pub case_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    /// Full evaluation detail
    pub execution: ScenarioExecution,
}

impl Decision {
    /// Build a decision from a finished evaluation
    pub fn from_execution(execution: ScenarioExecution, trigger: &TriggerObject) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: execution.organization_id.clone(),
            scenario_id: execution.scenario_id.clone(),
            scenario_iteration_id: execution.scenario_iteration_id.clone(),
            trigger_object_id: trigger.object_id().map(str::to_string),
            trigger_object_table: execution.trigger_object_table.clone(),
            score: execution.score,
            outcome: execution.outcome,
            case_id: None,
            created_at: execution.evaluated_at,
            execution,
        }
    }
}

/// Case to open alongside a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCase {
    pub id: Uuid,

    pub organization_id: String,

    pub name: String,

    pub scenario_id: String,

    pub decision_id: Uuid,

    pub outcome: Outcome,

    pub created_at: DateTime<Utc>,
}

impl NewCase {
    /// Case for a decision of `scenario`
    pub fn for_decision(decision: &Decision, scenario: &Scenario) -> Self {
        let subject = decision
            .trigger_object_id
            .as_deref()
            .unwrap_or(decision.trigger_object_table.as_str());
        Self {
            id: Uuid::new_v4(),
            organization_id: decision.organization_id.clone(),
            name: format!("{} - {}", scenario.name, subject),
            scenario_id: scenario.id.clone(),
            decision_id: decision.id,
            outcome: decision.outcome,
            created_at: decision.created_at,
        }
    }
}
