//! Storage repository for data access
//!
//! The toolkit never touches a concrete storage medium; persistence is the
//! responsibility of an external collaborator behind this capability trait.

use crate::shared::error::SecurityError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage repository trait
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Retrieve a stored value
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecurityError>;

    /// Store a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), SecurityError>;

    /// Delete a stored value
    async fn remove(&self, key: &str) -> Result<(), SecurityError>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool, SecurityError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// In-memory storage, used by tests and as a reference implementation
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageRepository for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecurityError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), SecurityError> {
        self.entries.write().await.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SecurityError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        storage.set("entry", b"payload").await.unwrap();
        assert!(storage.exists("entry").await.unwrap());
        assert_eq!(storage.get("entry").await.unwrap().as_deref(), Some(&b"payload"[..]));

        storage.remove("entry").await.unwrap();
        assert!(!storage.exists("entry").await.unwrap());
        assert_eq!(storage.get("entry").await.unwrap(), None);
    }
}
