//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use verdict_core::{
    DataModel, DataType, Field, Function, LinkToSingle, Node, Scenario, ScenarioIteration,
    ScoreThresholds, Table, TriggerObject, Value,
};
use verdict_runtime::{
    AggregateRequest, CancellationFlag, DataAccessor, EnvironmentFactory, EvaluationContext,
    EvaluationEnvironment, Evaluator, InMemoryDataStore, ListService, MetricsCollector,
    ReadFieldRequest, Result, RuntimeError, ScenarioEvaluator,
};

pub const ORG: &str = "org-1";

/// transactions -> accounts data model
pub fn data_model() -> Arc<DataModel> {
    Arc::new(
        DataModel::new()
            .add_table(
                Table::new("transactions")
                    .add_field(Field::new("object_id", DataType::String))
                    .add_field(Field::new("account_id", DataType::String))
                    .add_field(Field::new("amount", DataType::Float))
                    .add_field(Field::new("fee", DataType::Float).nullable())
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
            ),
    )
}

pub fn row(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub fn store() -> InMemoryDataStore {
    InMemoryDataStore::new()
        .with_row(
            ORG,
            "accounts",
            row(&[("object_id", Value::from("acc-1")), ("status", Value::from("frozen"))]),
        )
        .with_row(
            ORG,
            "transactions",
            row(&[("account_id", Value::from("acc-1")), ("amount", Value::Number(150.0))]),
        )
}

pub fn scenario() -> Scenario {
    Scenario::new("sc-1", ORG, "Large transfers", "transactions").with_live_iteration("it-1")
}

pub fn iteration(review: i32, decline: i32) -> ScenarioIteration {
    ScenarioIteration::new("it-1", "sc-1", ScoreThresholds::new(review, decline)).with_version(3)
}

pub fn trigger(amount: impl Into<Value>) -> Arc<TriggerObject> {
    Arc::new(
        TriggerObject::new("transactions")
            .with_field("object_id", "tx-1")
            .with_field("account_id", "acc-1")
            .with_field("amount", amount)
            .with_field("fee", Value::Null),
    )
}

/// `payload.amount > threshold`
pub fn amount_above(threshold: i64) -> Node {
    Node::binary(Function::Greater, Node::payload("amount"), Node::constant(threshold))
}

pub fn factory(data_accessor: Arc<dyn DataAccessor>) -> EnvironmentFactory {
    EnvironmentFactory::new(data_accessor, Arc::new(ListService::new()))
}

pub fn evaluator() -> ScenarioEvaluator {
    ScenarioEvaluator::new(factory(Arc::new(store()))).with_metrics(Arc::new(MetricsCollector::new()))
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
        let items: Vec<i32> = Vec::new();
        Ok(Value::from(items[3]))
    }
}

/// Evaluator that cancels the given flag and returns true
pub struct CancellingEvaluator {
    pub flag: CancellationFlag,
}

#[async_trait]
impl Evaluator for CancellingEvaluator {
    async fn evaluate(
        &self,
        _ctx: &EvaluationContext,
        _node: &Node,
        _env: &EvaluationEnvironment,
    ) -> Result<Value> {
        self.flag.cancel();
        Ok(Value::Bool(true))
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

/// Data accessor whose store is down
pub struct FailingAccessor;

#[async_trait]
impl DataAccessor for FailingAccessor {
    async fn read_field(&self, _request: &ReadFieldRequest) -> Result<Option<Value>> {
        Err(RuntimeError::DataStore("connection refused".to_string()))
    }

    async fn aggregate(&self, _request: &AggregateRequest) -> Result<Option<Value>> {
        Err(RuntimeError::DataStore("connection refused".to_string()))
    }
}
