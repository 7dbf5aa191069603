//! Session state and its storage.
//!
//! Everything a browser build would keep in local storage (the signed-in
//! session, pending handoff data between pages) goes through a
//! [`SessionContext`] backed by an explicit [`SessionStorage`].

mod memory;
mod sqlite;
mod storage;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;
pub use storage::SessionStorage;

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// The signed-in user's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to API requests.
    pub access_token: String,
    /// Email the user signed in with.
    pub email: Option<String>,
    /// When the token stops being accepted, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            email: None,
            expires_at: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }
}

/// Typed access to a [`SessionStorage`].
///
/// The session goes to the storage's own slot; other values are serialized
/// with bincode.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
}

impl SessionContext {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// A context over volatile in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStorage::new())
    }

    /// Returns the stored session, if any.
    pub async fn session(&self) -> Result<Option<Session>, StorageError> {
        self.storage.load_session().await
    }

    /// Stores the session, replacing any previous one.
    pub async fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        log::debug!("Storing session for {:?}", session.email);
        self.storage.save_session(session).await
    }

    /// Signs out locally.
    pub async fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.delete_session().await
    }

    /// Get a typed value for a key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(StorageError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Set a typed value for a key.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = bincode::serialize(value).map_err(StorageError::Serialization)?;
        self.storage.set_bytes(key, bytes).await
    }

    /// Delete a key.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.delete(key).await
    }

    /// Deletes the session and every key.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear().await
    }
}
