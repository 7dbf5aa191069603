//! Error types

mod api;
mod auth;
mod data_type;
mod server;
mod storage;

pub use api::*;
pub use auth::*;
pub use data_type::*;
pub use server::*;
pub use storage::*;

/// Top-level error returned by client, session and table service operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP call failed or the server rejected it.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No usable bearer token could be obtained.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A data-type id received from the server is not registered.
    #[error(transparent)]
    UnknownDataType(#[from] UnknownDataTypeError),

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server reply cannot be applied to the local table without breaking
    /// row/column alignment. Local state was left untouched.
    #[error("Reconciliation failed: {0}")]
    Reconciliation(String),
}

impl Error {
    /// Creates a reconciliation error.
    pub fn reconciliation(message: impl Into<String>) -> Self {
        Self::Reconciliation(message.into())
    }

    /// Returns the HTTP status code if the server rejected the request.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Network(_)) | Self::Api(ApiError::Timeout(_))
        )
    }

    /// Message suitable for a notification toast.
    ///
    /// Server rejections carry the server's own message; transport failures
    /// get a generic one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(api) => match api.server_message() {
                Some(message) => message.to_string(),
                None if self.is_network() => "The server could not be reached".to_string(),
                None => api.to_string(),
            },
            Self::Auth(_) => "Your session has ended, please sign in again".to_string(),
            other => other.to_string(),
        }
    }
}
