use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message used when neither the backend nor the transport said anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "Unknown error";

/// Fallback message when a token refresh fails without any detail.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";

/// Errors surfaced by the API client.
///
/// `Display` is always the human-readable message the caller should show.
/// The type is `Clone` because one refresh outcome is handed to every
/// request waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 that could not be recovered by a token refresh.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response was received.
    #[error("{0}")]
    Network(String),

    /// The refresh call failed; the local session has been torn down.
    #[error("{0}")]
    SessionExpired(String),

    /// The backend answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pick the first usable message: backend body, status text, transport, fallback.
pub fn resolve_message(
    body_message: Option<&str>,
    status_text: Option<&str>,
    transport_message: Option<&str>,
    fallback: &str,
) -> String {
    [body_message, status_text, transport_message]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|m| !m.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Extract the `message` field from a JSON error body, if there is one.
pub fn body_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build the normalized error for a non-2xx response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let transport = format!("Request failed with status code {}", status.as_u16());
        let message = resolve_message(
            body_message(body).as_deref(),
            status.canonical_reason(),
            Some(&transport),
            GENERIC_ERROR_MESSAGE,
        );
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Build the normalized error for a request that got no response.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let transport = err.to_string();
        ApiError::Network(resolve_message(
            None,
            None,
            Some(&transport),
            GENERIC_ERROR_MESSAGE,
        ))
    }

    /// Turn any failure of the refresh call into the terminal session error.
    pub fn into_session_expired(self) -> Self {
        match self {
            ApiError::SessionExpired(_) => self,
            other => {
                let message = other.to_string();
                ApiError::SessionExpired(resolve_message(
                    Some(&message),
                    None,
                    None,
                    SESSION_EXPIRED_MESSAGE,
                ))
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}
