//! In-memory session storage

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use super::Session;
use super::SessionStorage;
use crate::error::StorageError;

/// Session storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    session: RwLock<Option<Session>>,
    values: DashMap<String, Vec<u8>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, not counting the session.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemoryStorage {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.session.read().await.clone())
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StorageError> {
        *self.session.write().await = None;
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.session.write().await = None;
        self.values.clear();
        Ok(())
    }
}
