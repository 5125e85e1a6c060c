//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use verdict_core::{
    DataModel, DataType, Field, Function, LinkToSingle, Node, Outcome, Rule, Scenario,
    ScenarioIteration, ScoreThresholds, Table, TriggerObject, Value,
};
use verdict_runtime::{
    AggregateRequest, DataAccessor, EvaluationContext, EvaluationEnvironment, Evaluator,
    InMemoryDataStore, ReadFieldRequest, Result,
};
use verdict_sdk::{
    DecisionEngine, DecisionEngineBuilder, DecisionRequest, MemoryDecisionStore,
    MemoryScenarioRepository,
};

pub const ORG: &str = "org-1";

pub fn data_model() -> DataModel {
    DataModel::new()
        .add_table(
            Table::new("transactions")
                .add_field(Field::new("object_id", DataType::String))
                .add_field(Field::new("account_id", DataType::String))
                .add_field(Field::new("amount", DataType::Float))
                .add_link(LinkToSingle::new(
                    "account",
                    "transactions",
                    "account_id",
                    "accounts",
                    "object_id",
                )),
        )
        .add_table(
            Table::new("accounts")
                .add_field(Field::new("object_id", DataType::String))
                .add_field(Field::new("status", DataType::String)),
        )
}

pub fn store() -> InMemoryDataStore {
    let account: HashMap<String, Value> = [
        ("object_id".to_string(), Value::from("acc-1")),
        ("status".to_string(), Value::from("frozen")),
    ]
    .into_iter()
    .collect();
    InMemoryDataStore::new().with_row(ORG, "accounts", account)
}

/// `payload.amount > threshold`
pub fn amount_above(threshold: i64) -> Node {
    Node::binary(Function::Greater, Node::payload("amount"), Node::constant(threshold))
}

/// `account.status = "frozen"`
pub fn account_frozen() -> Node {
    let status = Node::function(Function::DatabaseAccess)
        .with_named_child("tableName", Node::constant("transactions"))
        .with_named_child("fieldName", Node::constant("status"))
        .with_named_child("path", Node::constant(Value::Array(vec![Value::from("account")])));
    Node::binary(Function::Equal, status, Node::constant("frozen"))
}

/// Live scenario: review above 1000, decline when the account is frozen too.
/// Declines open a case.
pub fn scenario() -> Scenario {
    Scenario::new("sc-1", ORG, "Large transfers", "transactions")
        .with_live_iteration("it-1")
        .with_case_outcomes(vec![Outcome::Decline])
}

pub fn iteration() -> ScenarioIteration {
    ScenarioIteration::new("it-1", "sc-1", ScoreThresholds::new(10, 50))
        .with_version(1)
        .with_trigger_condition(Node::binary(
            Function::GreaterOrEqual,
            Node::payload("amount"),
            Node::constant(100),
        ))
        .add_rule(Rule::new("large", "Large amount", amount_above(1000), 10))
        .add_rule(Rule::new("frozen", "Frozen account", account_frozen(), 40))
}

pub fn transaction(id: &str, account_id: &str, amount: i64) -> TriggerObject {
    TriggerObject::new("transactions")
        .with_field("object_id", id)
        .with_field("account_id", account_id)
        .with_field("amount", amount)
}

pub fn request(id: &str, account_id: &str, amount: i64) -> DecisionRequest {
    DecisionRequest::new(ORG, "sc-1", transaction(id, account_id, amount))
}

pub fn repository() -> MemoryScenarioRepository {
    MemoryScenarioRepository::new()
        .with_scenario(scenario())
        .with_iteration(iteration())
        .with_data_model(ORG, data_model())
}

/// Engine over the fixtures, with access to its decision store
pub struct TestEngine {
    pub engine: DecisionEngine,
    pub decisions: Arc<MemoryDecisionStore>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_builder(DecisionEngineBuilder::new())
    }

    pub fn with_builder(builder: DecisionEngineBuilder) -> Self {
        let decisions = Arc::new(MemoryDecisionStore::new());
        let engine = builder
            .with_scenario_repository(Arc::new(repository()))
            .with_decision_store(decisions.clone())
            .with_data_accessor(Arc::new(store()))
            .build()
            .expect("engine builds");
        Self { engine, decisions }
    }
}

/// Evaluator that panics when reached
pub struct PanickingEvaluator;

#[async_trait]
impl Evaluator for PanickingEvaluator {
    async fn evaluate(
        &self,
        _ctx: &EvaluationContext,
        _node: &Node,
        _env: &EvaluationEnvironment,
    ) -> Result<Value> {
        let limits: HashMap<&str, i64> = HashMap::new();
        Ok(Value::from(limits["daily"]))
    }
}

/// Data accessor counting its calls
#[derive(Default)]
pub struct CountingAccessor {
    pub calls: AtomicUsize,
}

#[async_trait]
impl DataAccessor for CountingAccessor {
    async fn read_field(&self, _request: &ReadFieldRequest) -> Result<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn aggregate(&self, _request: &AggregateRequest) -> Result<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}
