//! Session storage trait.

use async_trait::async_trait;

use super::Session;
use crate::error::StorageError;

/// Storage behind a [`SessionContext`](super::SessionContext).
///
/// The signed-in session has its own slot. Everything else is opaque bytes
/// under a string key.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Returns the stored session, if any.
    async fn load_session(&self) -> Result<Option<Session>, StorageError>;

    /// Replaces the stored session.
    async fn save_session(&self, session: &Session) -> Result<(), StorageError>;

    async fn delete_session(&self) -> Result<(), StorageError>;

    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Delete a key.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Deletes the session and every key.
    async fn clear(&self) -> Result<(), StorageError>;
}
