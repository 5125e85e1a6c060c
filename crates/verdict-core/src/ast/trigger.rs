//! Trigger objects

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field holding the business identifier of an object
pub const OBJECT_ID_FIELD: &str = "object_id";

/// The incoming object a decision is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerObject {
    /// Data model table the object belongs to
    pub table_name: String,

    /// Field values sent by the client
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

impl TriggerObject {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            data: HashMap::new(),
        }
    }

    /// Set a field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn object_id(&self) -> Option<&str> {
        self.field(OBJECT_ID_FIELD).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_object_fields() {
        let trigger = TriggerObject::new("transactions")
            .with_field("object_id", "tx-1")
            .with_field("amount", 2000);

        assert_eq!(trigger.object_id(), Some("tx-1"));
        assert_eq!(trigger.field("amount"), Some(&Value::Number(2000.0)));
        assert_eq!(trigger.field("missing"), None);
    }
}
