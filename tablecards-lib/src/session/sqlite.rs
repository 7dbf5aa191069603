//! SQLite session storage.
//!
//! The session is one row of the `session` table, with a column per field.
//! Expiry is kept as Unix milliseconds. Other values live in the
//! `session_values` key/value table.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::rusqlite;
use async_sqlite::rusqlite::OptionalExtension;
use async_trait::async_trait;
use chrono::DateTime;
use tokio::sync::RwLock;

use super::Session;
use super::SessionStorage;
use crate::error::StorageError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS session (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        access_token TEXT NOT NULL,
        email TEXT,
        expires_at INTEGER
    );
    CREATE TABLE IF NOT EXISTS session_values (
        key TEXT PRIMARY KEY,
        value BLOB NOT NULL
    );
";

/// The `session` row as SQLite stores it.
struct SessionRow {
    access_token: String,
    email: Option<String>,
    expires_at_ms: Option<i64>,
}

impl SessionRow {
    fn from_session(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            email: session.email.clone(),
            expires_at_ms: session.expires_at.map(|at| at.timestamp_millis()),
        }
    }

    fn into_session(self) -> Result<Session, StorageError> {
        let expires_at = self
            .expires_at_ms
            .map(|ms| {
                DateTime::from_timestamp_millis(ms)
                    .ok_or_else(|| StorageError::Corrupt(format!("session expiry {} is out of range", ms)))
            })
            .transpose()?;

        Ok(Session {
            access_token: self.access_token,
            email: self.email,
            expires_at,
        })
    }
}

/// Session storage that survives restarts.
///
/// The session row is read on first use and then served from memory; writes
/// go to the database first.
pub struct SqliteStorage {
    client: Client,
    /// `None` until the row has been read.
    session: RwLock<Option<Option<Session>>>,
}

impl SqliteStorage {
    /// Opens (or creates) the storage database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let client = ClientBuilder::new().path(path).open().await?;
        Self::init(client).await
    }

    /// Opens a throwaway in-memory database.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, StorageError> {
        client.conn(|conn| conn.execute_batch(SCHEMA)).await?;
        Ok(Self {
            client,
            session: RwLock::new(None),
        })
    }

    async fn read_session_row(&self) -> Result<Option<Session>, StorageError> {
        let row = self
            .client
            .conn(|conn| {
                conn.query_row(
                    "SELECT access_token, email, expires_at FROM session WHERE id = 1",
                    [],
                    |row| {
                        Ok(SessionRow {
                            access_token: row.get(0)?,
                            email: row.get(1)?,
                            expires_at_ms: row.get(2)?,
                        })
                    },
                )
                .optional()
            })
            .await?;

        row.map(SessionRow::into_session).transpose()
    }
}

#[async_trait]
impl SessionStorage for SqliteStorage {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        {
            let cached = self.session.read().await;
            if let Some(session) = cached.as_ref() {
                return Ok(session.clone());
            }
        }

        let mut cached = self.session.write().await;
        if let Some(session) = cached.as_ref() {
            return Ok(session.clone());
        }
        let session = self.read_session_row().await?;
        log::debug!("Read stored session for {:?}", session.as_ref().and_then(|s| s.email.as_deref()));
        *cached = Some(session.clone());
        Ok(session)
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let mut cached = self.session.write().await;
        let row = SessionRow::from_session(session);
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO session (id, access_token, email, expires_at)
                     VALUES (1, ?1, ?2, ?3)",
                    rusqlite::params![row.access_token, row.email, row.expires_at_ms],
                )
            })
            .await?;
        *cached = Some(Some(session.clone()));
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StorageError> {
        let mut cached = self.session.write().await;
        self.client
            .conn(|conn| conn.execute("DELETE FROM session", []))
            .await?;
        *cached = Some(None);
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let key = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT value FROM session_values WHERE key = ?1",
                    [key],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await?;
        Ok(value)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let key = key.to_string();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO session_values (key, value) VALUES (?1, ?2)",
                    rusqlite::params![key, value],
                )
            })
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM session_values WHERE key = ?1", [key]))
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut cached = self.session.write().await;
        self.client
            .conn(|conn| conn.execute_batch("DELETE FROM session; DELETE FROM session_values;"))
            .await?;
        *cached = Some(None);
        Ok(())
    }
}
