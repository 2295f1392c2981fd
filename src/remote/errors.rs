use serde::Deserialize;
use thiserror::Error;

/// Shown to the user when a call fails without an HTTP response to explain it
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The platform answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Transport failure, or a success body we could not decode
    #[error("unexpected error: {detail}")]
    Unexpected { detail: String },
}

impl RemoteError {
    /// Build an API error from a failed response body.
    ///
    /// The body is parsed best-effort: a readable `message` field wins,
    /// anything else falls back to a message naming the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_server_message(body)
            .unwrap_or_else(|| format!("Request failed with status code {status}"));
        RemoteError::Api { status, message }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        RemoteError::Unexpected {
            detail: detail.into(),
        }
    }

    /// The text that ends up in the workflow's error message
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Api { message, .. } => message.clone(),
            RemoteError::Unexpected { .. } => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            RemoteError::Unexpected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::unexpected(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<ServerMessage>,
}

// Validation failures come back as a list of messages, everything else as one string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerMessage {
    Single(String),
    Many(Vec<String>),
}

fn extract_server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.message? {
        ServerMessage::Single(message) => message,
        ServerMessage::Many(messages) => messages.join("; "),
    };
    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
