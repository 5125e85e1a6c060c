//! List backend implementations

mod memory;

pub use memory::MemoryBackend;

use crate::error::Result;
use verdict_core::Value;

/// Trait for list storage backends
#[async_trait::async_trait]
pub trait ListBackend: Send + Sync {
    /// Check if a value exists in the list
    async fn contains(&self, list_id: &str, value: &Value) -> Result<bool>;

    /// Add a value to the list
    async fn add(&self, list_id: &str, value: Value) -> Result<()>;

    /// Remove a value from the list
    async fn remove(&self, list_id: &str, value: &Value) -> Result<()>;

    /// Get all values in a list
    async fn get_all(&self, list_id: &str) -> Result<Vec<Value>>;
}
