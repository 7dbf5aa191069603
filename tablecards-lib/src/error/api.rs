//! API error types

use std::time::Duration;

use super::ServerErrorDetail;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message (server-provided when available, raw body otherwise).
        message: String,
        /// Structured error body, if the server sent one.
        detail: Option<Box<ServerErrorDetail>>,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a new HTTP error carrying the server's structured error body.
    pub fn http_with_detail(status: u16, message: impl Into<String>, detail: ServerErrorDetail) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail: Some(Box::new(detail)),
        }
    }

    /// Builds the error for a non-success reply from its status and raw body.
    pub fn from_response_body(status: u16, body: String) -> Self {
        match ServerErrorDetail::parse(&body) {
            Some(detail) => {
                let message = detail.message.clone();
                Self::http_with_detail(status, message, detail)
            }
            None => Self::http(status, body),
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the message the server attached to its rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref().map(|d| d.message.as_str()),
            _ => None,
        }
    }

    /// Returns the structured server error, if available.
    pub fn detail(&self) -> Option<&ServerErrorDetail> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for 4xx replies.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }
}
