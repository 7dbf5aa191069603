//! Session storage error types

/// Errors raised by [`SessionStorage`](crate::session::SessionStorage) backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
    #[error("stored data is unreadable: {0}")]
    Corrupt(String),
}
