//! In-memory data store
//!
//! Rows are grouped by organization and table. Suitable for tests and
//! embedding; data is lost when the process exits.

use super::aggregation::aggregate_values;
use super::query::{AggregateRequest, Filter, ReadFieldRequest};
use super::DataAccessor;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use verdict_core::ast::trigger::OBJECT_ID_FIELD;
use verdict_core::{LinkToSingle, TriggerObject, Value};

type Row = HashMap<String, Value>;

/// In-memory tenant data store
#[derive(Default)]
pub struct InMemoryDataStore {
    /// organization_id -> table -> rows
    rows: RwLock<HashMap<String, HashMap<String, Vec<Row>>>>,
}

impl InMemoryDataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row while building the store
    pub fn with_row(
        mut self,
        organization_id: impl Into<String>,
        table: impl Into<String>,
        row: HashMap<String, Value>,
    ) -> Self {
        self.rows
            .get_mut()
            .entry(organization_id.into())
            .or_default()
            .entry(table.into())
            .or_default()
            .push(row);
        self
    }

    /// Insert a row
    pub async fn insert_row(&self, organization_id: &str, table: &str, row: HashMap<String, Value>) {
        let mut rows = self.rows.write().await;
        rows.entry(organization_id.to_string())
            .or_default()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Number of rows stored for a table
    pub async fn row_count(&self, organization_id: &str, table: &str) -> usize {
        let rows = self.rows.read().await;
        rows.get(organization_id)
            .and_then(|tables| tables.get(table))
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn find_row<'a>(rows: &'a [Row], field: &str, value: &Value) -> Option<&'a Row> {
    if value.is_null() {
        return None;
    }
    rows.iter().find(|row| row.get(field) == Some(value))
}

fn matches_all(row: &Row, filters: &[Filter]) -> Result<bool> {
    for filter in filters {
        if !filter.matches(row)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Walk a link path from the trigger object, returning the row it ends on
fn walk_links<'a>(
    tables: &'a HashMap<String, Vec<Row>>,
    trigger: &'a TriggerObject,
    links: &[LinkToSingle],
) -> Option<&'a Row> {
    let table_rows = move |name: &str| tables.get(name).map(Vec::as_slice).unwrap_or(&[]);

    let mut current: &Row = match links.first() {
        Some(_) => &trigger.data,
        // Without a path the stored copy of the trigger object wins over the payload
        None => match trigger.data.get(OBJECT_ID_FIELD) {
            Some(id) => find_row(table_rows(&trigger.table_name), OBJECT_ID_FIELD, id)
                .unwrap_or(&trigger.data),
            None => &trigger.data,
        },
    };

    for link in links {
        let key = current.get(&link.child_field_name).cloned().unwrap_or_default();
        match find_row(table_rows(&link.parent_table_name), &link.parent_field_name, &key) {
            Some(row) => current = row,
            None => {
                tracing::debug!(
                    link = %link.name,
                    table = %link.parent_table_name,
                    "no row found while walking link path"
                );
                return None;
            }
        }
    }

    Some(current)
}

#[async_trait]
impl DataAccessor for InMemoryDataStore {
    async fn read_field(&self, request: &ReadFieldRequest) -> Result<Option<Value>> {
        let rows = self.rows.read().await;
        let empty = HashMap::new();
        let tables = rows.get(&request.organization_id).unwrap_or(&empty);

        let row = match walk_links(tables, &request.trigger, &request.links) {
            Some(row) => row,
            None => return Ok(None),
        };

        if !matches_all(row, &request.filters)? {
            return Ok(None);
        }

        Ok(Some(row.get(&request.field_name).cloned().unwrap_or(Value::Null)))
    }

    async fn aggregate(&self, request: &AggregateRequest) -> Result<Option<Value>> {
        let rows = self.rows.read().await;
        let empty = HashMap::new();
        let tables = rows.get(&request.organization_id).unwrap_or(&empty);
        let table_rows = tables
            .get(&request.table_name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        // (field on the aggregated table, key of the anchor row)
        let related_key = match &request.related {
            Some(related) => {
                let key = walk_links(tables, &related.trigger, &related.links)
                    .and_then(|anchor| anchor.get(&related.back_link.parent_field_name))
                    .filter(|key| !key.is_null());
                match key {
                    Some(key) => Some((related.back_link.child_field_name.as_str(), key)),
                    None => return aggregate_values(request.aggregation, &[]),
                }
            }
            None => None,
        };

        let mut values = Vec::new();
        for row in table_rows {
            if let Some((field, key)) = related_key {
                if row.get(field) != Some(key) {
                    continue;
                }
            }
            if matches_all(row, &request.filters)? {
                values.push(row.get(&request.field_name).cloned().unwrap_or(Value::Null));
            }
        }

        aggregate_values(request.aggregation, &values)
    }
}
