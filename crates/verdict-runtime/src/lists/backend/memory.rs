//! In-memory list backend

use super::ListBackend;
use crate::error::{Result, RuntimeError};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use verdict_core::Value;

/// In-memory list backend
///
/// Values are keyed by a normalized form so that string membership ignores
/// case; the original value is kept for `get_all`.
#[derive(Default)]
pub struct MemoryBackend {
    /// list_id -> normalized key -> value
    lists: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryBackend {
    /// Create a new memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a list while building the backend
    pub fn with_values(mut self, list_id: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Result<Self> {
        let list = self.lists.get_mut().entry(list_id.into()).or_default();
        for value in values {
            list.insert(Self::value_to_key(&value)?, value);
        }
        Ok(self)
    }

    fn value_to_key(value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(format!("s:{}", s.to_lowercase())),
            Value::Number(n) => Ok(format!("n:{}", n)),
            Value::Bool(b) => Ok(format!("b:{}", b)),
            Value::Null => Err(RuntimeError::InvalidArgument(
                "null cannot be stored in a list".to_string(),
            )),
            Value::Array(_) | Value::Object(_) => serde_json::to_string(value)
                .map(|json| format!("j:{}", json))
                .map_err(|e| {
                    RuntimeError::InvalidArgument(format!("cannot serialize value for list: {}", e))
                }),
        }
    }
}

#[async_trait::async_trait]
impl ListBackend for MemoryBackend {
    async fn contains(&self, list_id: &str, value: &Value) -> Result<bool> {
        if value.is_null() {
            return Ok(false);
        }
        let key = Self::value_to_key(value)?;
        let lists = self.lists.read().await;

        Ok(lists
            .get(list_id)
            .map(|list| list.contains_key(&key))
            .unwrap_or(false))
    }

    async fn add(&self, list_id: &str, value: Value) -> Result<()> {
        let key = Self::value_to_key(&value)?;
        let mut lists = self.lists.write().await;
        lists.entry(list_id.to_string()).or_default().insert(key, value);
        Ok(())
    }

    async fn remove(&self, list_id: &str, value: &Value) -> Result<()> {
        let key = Self::value_to_key(value)?;
        let mut lists = self.lists.write().await;
        if let Some(list) = lists.get_mut(list_id) {
            list.remove(&key);
        }
        Ok(())
    }

    async fn get_all(&self, list_id: &str) -> Result<Vec<Value>> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(list_id)
            .map(|list| list.values().cloned().collect())
            .unwrap_or_default())
    }
}
