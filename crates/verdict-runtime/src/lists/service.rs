//! List service for custom list lookups

use super::backend::ListBackend;
use crate::error::{Result, RuntimeError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use verdict_core::Value;

/// List service that routes list lookups to the backend serving each list
#[derive(Clone, Default)]
pub struct ListService {
    /// Map of list_id to backend
    backends: Arc<RwLock<HashMap<String, Arc<dyn ListBackend>>>>,
}

impl ListService {
    /// Create a list service without any list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list service with one backend per list
    pub fn new_with_backends(backends: HashMap<String, Arc<dyn ListBackend>>) -> Self {
        Self {
            backends: Arc::new(RwLock::new(backends)),
        }
    }

    /// Serve `list_id` from `backend`
    pub async fn register(&self, list_id: impl Into<String>, backend: Arc<dyn ListBackend>) {
        let mut backends = self.backends.write().await;
        backends.insert(list_id.into(), backend);
    }

    async fn backend(&self, list_id: &str) -> Result<Arc<dyn ListBackend>> {
        let backends = self.backends.read().await;
        backends.get(list_id).cloned().ok_or_else(|| {
            tracing::warn!(list_id, "custom list not configured");
            RuntimeError::ListNotFound(list_id.to_string())
        })
    }

    /// Check if a value exists in a list
    pub async fn contains(&self, list_id: &str, value: &Value) -> Result<bool> {
        self.backend(list_id).await?.contains(list_id, value).await
    }

    /// Add a value to a list
    pub async fn add(&self, list_id: &str, value: Value) -> Result<()> {
        self.backend(list_id).await?.add(list_id, value).await
    }

    /// Remove a value from a list
    pub async fn remove(&self, list_id: &str, value: &Value) -> Result<()> {
        self.backend(list_id).await?.remove(list_id, value).await
    }

    /// Get all values in a list
    pub async fn get_all(&self, list_id: &str) -> Result<Vec<Value>> {
        self.backend(list_id).await?.get_all(list_id).await
    }

    /// Get list of all configured list IDs
    pub async fn list_ids(&self) -> Vec<String> {
        let backends = self.backends.read().await;
        backends.keys().cloned().collect()
    }

    /// Check if a list is configured
    pub async fn has_list(&self, list_id: &str) -> bool {
        let backends = self.backends.read().await;
        backends.contains_key(list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::MemoryBackend;

    #[tokio::test]
    async fn test_list_service_multiple_backends() {
        let mut backends: HashMap<String, Arc<dyn ListBackend>> = HashMap::new();
        backends.insert(
            "list1".to_string(),
            Arc::new(MemoryBackend::new().with_values("list1", vec![Value::from("value1")]).unwrap()),
        );
        backends.insert(
            "list2".to_string(),
            Arc::new(MemoryBackend::new().with_values("list2", vec![Value::from("value2")]).unwrap()),
        );

        let service = ListService::new_with_backends(backends);

        assert!(service.contains("list1", &Value::from("value1")).await.unwrap());
        assert!(!service.contains("list1", &Value::from("value2")).await.unwrap());
        assert!(service.contains("list2", &Value::from("value2")).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_list_is_an_error() {
        let service = ListService::new();
        let err = service.contains("list3", &Value::from("any")).await.unwrap_err();
        assert!(matches!(err, RuntimeError::ListNotFound(id) if id == "list3"));
        assert!(!service.has_list("list3").await);
    }

    #[tokio::test]
    async fn test_register_and_add() {
        let service = ListService::new();
        service.register("vip", Arc::new(MemoryBackend::new())).await;
        service.add("vip", Value::from("alice")).await.unwrap();

        assert!(service.has_list("vip").await);
        assert_eq!(service.get_all("vip").await.unwrap(), vec![Value::from("alice")]);
        assert_eq!(service.list_ids().await, vec!["vip".to_string()]);
    }
}
