//! Tenant data model
//!
//! A data model describes the tables an organization sends to the engine,
//! the typed fields of each table, and the one-to-one links ("link to
//! single") that let a rule navigate from a child row to its parent row.

use crate::error::{CoreError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder timestamp returned by dry-run reads
pub const PLACEHOLDER_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

/// Declared type of a data model field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
    Timestamp,
    Unknown,
}

impl DataType {
    /// Type-correct placeholder used when evaluating with fake values.
    ///
    /// Numbers are `1` so that a placeholder divisor never trips the
    /// division-by-zero check during validation.
    pub fn placeholder(&self) -> Value {
        match self {
            DataType::Bool => Value::Bool(false),
            DataType::Int | DataType::Float => Value::Number(1.0),
            DataType::String => Value::String(String::new()),
            DataType::Timestamp => Value::String(PLACEHOLDER_TIMESTAMP.to_string()),
            DataType::Unknown => Value::Null,
        }
    }
}

/// A typed field of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            description: None,
        }
    }

    /// Mark field as nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// One-to-one link from a child table to a parent table.
///
/// `child_table.child_field == parent_table.parent_field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToSingle {
    pub name: String,
    pub parent_table_name: String,
    pub parent_field_name: String,
    pub child_table_name: String,
    pub child_field_name: String,
}

impl LinkToSingle {
    pub fn new(
        name: impl Into<String>,
        child_table_name: impl Into<String>,
        child_field_name: impl Into<String>,
        parent_table_name: impl Into<String>,
        parent_field_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent_table_name: parent_table_name.into(),
            parent_field_name: parent_field_name.into(),
            child_table_name: child_table_name.into(),
            child_field_name: child_field_name.into(),
        }
    }
}

/// A table of the data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Field>,
    #[serde(default)]
    pub links_to_single: HashMap<String, LinkToSingle>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
            links_to_single: HashMap::new(),
        }
    }

    /// Add a field
    pub fn add_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Add a link to a parent table
    pub fn add_link(mut self, link: LinkToSingle) -> Self {
        self.links_to_single.insert(link.name.clone(), link);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

/// The data model of one organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    #[serde(default)]
    pub tables: HashMap<String, Table>,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    pub fn add_table(mut self, table: Table) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn field(&self, table: &str, field: &str) -> Option<&Field> {
        self.table(table).and_then(|t| t.field(field))
    }

    /// Resolve a path of link names starting at `root_table`.
    ///
    /// Each hop must be declared on the current table and its child table
    /// must be the current table. Returns the links in traversal order; the
    /// last link's parent table is the table the path ends on.
    pub fn resolve_link_path(&self, root_table: &str, path: &[&str]) -> Result<Vec<LinkToSingle>> {
        let mut current = root_table;
        let mut links = Vec::with_capacity(path.len());

        for link_name in path {
            let table = self.table(current).ok_or_else(|| {
                CoreError::InvalidDataModel(format!("table '{}' not found", current))
            })?;
            let link = table.links_to_single.get(*link_name).ok_or_else(|| {
                CoreError::InvalidDataModel(format!(
                    "link '{}' not found on table '{}'",
                    link_name, current
                ))
            })?;
            if link.child_table_name != current {
                return Err(CoreError::InvalidDataModel(format!(
                    "link '{}' has child table '{}', expected '{}'",
                    link_name, link.child_table_name, current
                )));
            }
            links.push(link.clone());
            current = &link.parent_table_name;
        }

        Ok(links)
    }
}
