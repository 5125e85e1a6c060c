//! Scenario, iteration and rule definitions

use super::node::Node;
use super::outcome::{Outcome, ScoreThresholds};
use serde::{Deserialize, Serialize};

/// A scored rule of an iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule ID
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Boolean expression evaluated against the trigger object
    pub formula: Node,

    /// Added to the running score when the formula is true
    pub score_modifier: i32,

    /// Optional grouping label, carried to rule executions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_group: Option<String>,
}

impl Rule {
    /// Create a new rule
    pub fn new(id: impl Into<String>, name: impl Into<String>, formula: Node, score_modifier: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            formula,
            score_modifier,
            rule_group: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the rule group
    pub fn with_rule_group(mut self, group: impl Into<String>) -> Self {
        self.rule_group = Some(group.into());
        self
    }
}

/// One versioned body of a scenario.
///
/// Immutable once published; the live iteration is the one evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioIteration {
    pub id: String,

    pub scenario_id: String,

    /// Version number, absent on drafts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Condition selecting the objects this scenario applies to.
    /// An iteration without one applies to every object of the trigger table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_condition: Option<Node>,

    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<Rule>,

    pub thresholds: ScoreThresholds,
}

impl ScenarioIteration {
    pub fn new(id: impl Into<String>, scenario_id: impl Into<String>, thresholds: ScoreThresholds) -> Self {
        Self {
            id: id.into(),
            scenario_id: scenario_id.into(),
            version: None,
            trigger_condition: None,
            rules: Vec::new(),
            thresholds,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_trigger_condition(mut self, condition: Node) -> Self {
        self.trigger_condition = Some(condition);
        self
    }

    /// Add a rule
    pub fn add_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A named rule configuration bound to one trigger table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,

    /// Owning organization (tenant)
    pub organization_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Table of the objects this scenario decides on
    pub trigger_object_type: String,

    /// Published iteration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_iteration_id: Option<String>,

    /// Outcomes for which a case is opened alongside the decision
    #[serde(default)]
    pub case_outcomes: Vec<Outcome>,
}

impl Scenario {
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        trigger_object_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            name: name.into(),
            description: None,
            trigger_object_type: trigger_object_type.into(),
            live_iteration_id: None,
            case_outcomes: Vec::new(),
        }
    }

    pub fn with_live_iteration(mut self, iteration_id: impl Into<String>) -> Self {
        self.live_iteration_id = Some(iteration_id.into());
        self
    }

    pub fn with_case_outcomes(mut self, outcomes: Vec<Outcome>) -> Self {
        self.case_outcomes = outcomes;
        self
    }

    pub fn opens_case_for(&self, outcome: Outcome) -> bool {
        self.case_outcomes.contains(&outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Function;

    #[test]
    fn test_iteration_builder() {
        let iteration = ScenarioIteration::new("it-1", "sc-1", ScoreThresholds::new(10, 50))
            .with_version(3)
            .with_trigger_condition(Node::constant(true))
            .add_rule(Rule::new(
                "r1",
                "Large amount",
                Node::binary(Function::Greater, Node::payload("amount"), Node::constant(1000)),
                10,
            ));

        assert_eq!(iteration.version, Some(3));
        assert_eq!(iteration.rules.len(), 1);
        assert_eq!(iteration.rules[0].score_modifier, 10);
    }

    #[test]
    fn test_scenario_case_outcomes() {
        let scenario = Scenario::new("sc-1", "org-1", "Fraud", "transactions")
            .with_case_outcomes(vec![Outcome::Decline, Outcome::BlockAndReview]);
        assert!(scenario.opens_case_for(Outcome::Decline));
        assert!(!scenario.opens_case_for(Outcome::Review));
    }

    #[test]
    fn test_iteration_json_round_trip() {
        let iteration = ScenarioIteration::new("it-1", "sc-1", ScoreThresholds::new(10, 50))
            .add_rule(Rule::new("r1", "Always", Node::constant(true), 5).with_rule_group("misc"));

        let json = serde_json::to_string(&iteration).unwrap();
        let back: ScenarioIteration = serde_json::from_str(&json).unwrap();
        assert_eq!(iteration, back);
    }
}
