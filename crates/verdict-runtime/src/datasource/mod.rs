//! Data access layer
//!
//! Evaluators never talk to storage directly. They describe what they need
//! with a [`ReadFieldRequest`] or an [`AggregateRequest`] and hand it to a
//! [`DataAccessor`]:
//! - `read_field` resolves zero or one row by walking link-to-single
//!   relations from the trigger object
//! - `aggregate` reduces the rows of a table that match a set of filters
//!
//! [`InMemoryDataStore`] is the reference implementation used by tests and
//! embedders.

pub mod aggregation;
pub mod memory;
pub mod query;

pub use aggregation::aggregate_values;
pub use memory::InMemoryDataStore;
pub use query::{
    AggregateRequest, AggregationType, Filter, FilterOperator, ReadFieldRequest, RelatedRows,
};

use crate::error::Result;
use async_trait::async_trait;
use verdict_core::Value;

/// Tenant data store as seen by the evaluators
#[async_trait]
pub trait DataAccessor: Send + Sync {
    /// Read one field from the row reached by the request's link path.
    ///
    /// Returns `None` when no row matches. A matching row whose field is
    /// absent or null yields `Some(Value::Null)`.
    async fn read_field(&self, request: &ReadFieldRequest) -> Result<Option<Value>>;

    /// Aggregate a field over the filtered rows of a table.
    ///
    /// Returns `None` when the filtered set is empty and the aggregation has
    /// no defined value for an empty set.
    async fn aggregate(&self, request: &AggregateRequest) -> Result<Option<Value>>;
}
