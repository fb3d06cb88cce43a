use thiserror::Error;

use super::envelope::ResponseEnvelope;

/// Message used when a failed response carries no usable `message` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 401. The stored credential has already been cleared and the
    /// navigator invoked by the time the caller sees this.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response, or a 2xx envelope with `status: "error"`.
    #[error("{message}")]
    Application { status: Option<u16>, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Maximum length for response bodies echoed into log lines
const MAX_LOGGED_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_LOGGED_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_LOGGED_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Classify a failed response. The message is the envelope's `message`
    /// when present, the generic fallback otherwise.
    pub fn from_status(status: reqwest::StatusCode, envelope: &ResponseEnvelope) -> Self {
        let message = envelope.message_or_fallback();
        match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            code => ApiError::Application {
                status: Some(code),
                message,
            },
        }
    }

    /// The human-readable message, exactly as the server (or fallback) gave it.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized { message } | ApiError::Application { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status of the failed response, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Application { status, .. } => *status,
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
