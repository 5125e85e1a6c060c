//! Environment factory
//!
//! Holds the long-lived collaborators (data accessor, list service, custom
//! evaluators) and builds a fresh [`EvaluationEnvironment`] for every
//! evaluation.

use super::environment::EvaluationEnvironment;
use super::evaluator::Evaluator;
use super::evaluators::register_builtins;
use crate::datasource::DataAccessor;
use crate::lists::ListService;
use std::sync::Arc;
use verdict_core::Function;

/// Builds evaluation environments
#[derive(Clone)]
pub struct EnvironmentFactory {
    data_accessor: Arc<dyn DataAccessor>,
    list_service: Arc<ListService>,
    custom: Vec<(Function, Arc<dyn Evaluator>)>,
}

impl EnvironmentFactory {
    /// Create a factory for the built-in catalog
    pub fn new(data_accessor: Arc<dyn DataAccessor>, list_service: Arc<ListService>) -> Self {
        Self {
            data_accessor,
            list_service,
            custom: Vec::new(),
        }
    }

    /// Register an additional evaluator in every environment built.
    ///
    /// Registering a tag that is already taken panics when the environment
    /// is built.
    pub fn with_evaluator(mut self, function: Function, evaluator: Arc<dyn Evaluator>) -> Self {
        self.custom.push((function, evaluator));
        self
    }

    pub fn data_accessor(&self) -> &Arc<dyn DataAccessor> {
        &self.data_accessor
    }

    pub fn list_service(&self) -> &Arc<ListService> {
        &self.list_service
    }

    /// Build a fresh environment
    pub fn build(&self) -> EvaluationEnvironment {
        let mut env = EvaluationEnvironment::new();
        register_builtins(&mut env, self.data_accessor.clone(), self.list_service.clone());
        for (function, evaluator) in &self.custom {
            env.add_evaluator(function.clone(), evaluator.clone());
        }
        env
    }
}
