//! Authentication error types

/// Errors raised while obtaining a bearer token for a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// There is no stored session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The stored session token has expired.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// Reading the session from storage failed.
    #[error("Session storage error: {0}")]
    Storage(String),
}
