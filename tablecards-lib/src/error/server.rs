//! Structured error bodies returned by the table-storage backend

use serde::Deserialize;

/// Error body sent with a rejected request.
///
/// The backend replies with `{"message": "...", "error": "...", "status": 400}`;
/// only `message` is required.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerErrorDetail {
    /// Human-readable reason for the rejection.
    pub message: String,
    /// Short error class (e.g. "Bad Request").
    #[serde(default)]
    pub error: Option<String>,
    /// Status code echoed in the body.
    #[serde(default)]
    pub status: Option<u16>,
}

impl ServerErrorDetail {
    /// Creates a detail with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            status: None,
        }
    }

    /// Parses a response body, returning `None` if it is not a structured error.
    ///
    /// Some endpoints answer with a list of messages (validation failures);
    /// those are joined into one.
    pub fn parse(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Message {
            One(String),
            Many(Vec<String>),
        }

        #[derive(Deserialize)]
        struct Raw {
            message: Message,
            #[serde(default)]
            error: Option<String>,
            #[serde(default)]
            status: Option<u16>,
        }

        let raw: Raw = serde_json::from_str(body).ok()?;
        let message = match raw.message {
            Message::One(message) => message,
            Message::Many(messages) => messages.join("; "),
        };

        Some(Self {
            message,
            error: raw.error,
            status: raw.status,
        })
    }
}

impl std::fmt::Display for ServerErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(error) => write!(f, "[{}] {}", error, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
