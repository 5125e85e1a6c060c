//! Built-in evaluators
//!
//! One evaluator per built-in function tag. Pure functions live in
//! `scalar` and `time`; `payload`, `database_access`, `aggregator`,
//! `filter` and `custom_list` read data.

pub mod aggregator;
pub mod custom_list;
pub mod database_access;
pub mod filter;
pub mod payload;
pub mod scalar;
pub mod time;

pub use aggregator::AggregatorEvaluator;
pub use custom_list::CustomListEvaluator;
pub use database_access::DatabaseAccessEvaluator;
pub use filter::FilterEvaluator;
pub use payload::PayloadEvaluator;
pub use time::{TimeAddEvaluator, TimeNowEvaluator, TimestampExtractEvaluator};

use super::environment::EvaluationEnvironment;
use super::operators::{ArithmeticOp, CompareOp, StringOp};
use crate::datasource::DataAccessor;
use crate::lists::ListService;
use scalar::{
    ArithmeticEvaluator, ComparisonEvaluator, EmptinessEvaluator, ListEvaluator, LogicEvaluator,
    LogicOp, MembershipEvaluator, NotEvaluator, StringConcatEvaluator, StringPredicateEvaluator,
};
use std::sync::Arc;
use verdict_core::Function;

/// Register an evaluator for every built-in function
pub(crate) fn register_builtins(
    env: &mut EvaluationEnvironment,
    data_accessor: Arc<dyn DataAccessor>,
    list_service: Arc<ListService>,
) {
    env.add_evaluator(Function::Add, Arc::new(ArithmeticEvaluator::new(ArithmeticOp::Add)));
    env.add_evaluator(Function::Subtract, Arc::new(ArithmeticEvaluator::new(ArithmeticOp::Sub)));
    env.add_evaluator(Function::Multiply, Arc::new(ArithmeticEvaluator::new(ArithmeticOp::Mul)));
    env.add_evaluator(Function::Divide, Arc::new(ArithmeticEvaluator::new(ArithmeticOp::Div)));

    env.add_evaluator(Function::Greater, Arc::new(ComparisonEvaluator::new(CompareOp::Gt)));
    env.add_evaluator(Function::GreaterOrEqual, Arc::new(ComparisonEvaluator::new(CompareOp::Ge)));
    env.add_evaluator(Function::Less, Arc::new(ComparisonEvaluator::new(CompareOp::Lt)));
    env.add_evaluator(Function::LessOrEqual, Arc::new(ComparisonEvaluator::new(CompareOp::Le)));
    env.add_evaluator(Function::Equal, Arc::new(ComparisonEvaluator::new(CompareOp::Eq)));
    env.add_evaluator(Function::NotEqual, Arc::new(ComparisonEvaluator::new(CompareOp::Ne)));

    env.add_evaluator(Function::And, Arc::new(LogicEvaluator::new(LogicOp::And)));
    env.add_evaluator(Function::Or, Arc::new(LogicEvaluator::new(LogicOp::Or)));
    env.add_evaluator(Function::Not, Arc::new(NotEvaluator));

    env.add_evaluator(Function::List, Arc::new(ListEvaluator));
    env.add_evaluator(Function::IsInList, Arc::new(MembershipEvaluator::new(false)));
    env.add_evaluator(Function::IsNotInList, Arc::new(MembershipEvaluator::new(true)));

    env.add_evaluator(
        Function::StringContains,
        Arc::new(StringPredicateEvaluator::new(StringOp::Contains, false)),
    );
    env.add_evaluator(
        Function::StringNotContains,
        Arc::new(StringPredicateEvaluator::new(StringOp::Contains, true)),
    );
    env.add_evaluator(
        Function::StringStartsWith,
        Arc::new(StringPredicateEvaluator::new(StringOp::StartsWith, false)),
    );
    env.add_evaluator(
        Function::StringEndsWith,
        Arc::new(StringPredicateEvaluator::new(StringOp::EndsWith, false)),
    );
    env.add_evaluator(Function::IsEmpty, Arc::new(EmptinessEvaluator::new(false)));
    env.add_evaluator(Function::IsNotEmpty, Arc::new(EmptinessEvaluator::new(true)));
    env.add_evaluator(Function::StringConcat, Arc::new(StringConcatEvaluator));

    env.add_evaluator(Function::Payload, Arc::new(PayloadEvaluator));
    env.add_evaluator(
        Function::DatabaseAccess,
        Arc::new(DatabaseAccessEvaluator::new(data_accessor.clone())),
    );
    env.add_evaluator(Function::Aggregator, Arc::new(AggregatorEvaluator::new(data_accessor)));
    env.add_evaluator(Function::Filter, Arc::new(FilterEvaluator));
    env.add_evaluator(Function::CustomListAccess, Arc::new(CustomListEvaluator::new(list_service)));

    env.add_evaluator(Function::TimeNow, Arc::new(TimeNowEvaluator));
    env.add_evaluator(Function::TimeAdd, Arc::new(TimeAddEvaluator));
    env.add_evaluator(Function::TimestampExtract, Arc::new(TimestampExtractEvaluator));
}
