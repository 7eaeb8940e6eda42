//! Error taxonomy
//!
//! Every failure surfaced by the library maps to one of the variants
//! below. Transport and authentication failures are logged at the point
//! of failure and re-raised; deserialization leniency (unknown fields,
//! unknown enum values on the graceful path) is logged only.

use serde::{Deserialize, Serialize};

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token provider refused to issue a bearer token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP-level failure with a server-provided reason and no
    /// structured error body.
    #[error("HTTP {status}: {reason}")]
    Transport { status: u16, reason: String },

    /// Failure raised by the HTTP client library itself (connection,
    /// timeout, malformed request) rather than by the server.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Non-2xx response carrying a structured error body.
    #[error("{0}")]
    Api(ErrorResponse),

    /// Response payload did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Strict-mode enum construction rejected an unrecognized value.
    #[error("{value:?} is not a valid {name}. Expected one of: {known}")]
    UnknownEnumValue {
        name: String,
        value: String,
        known: String,
    },

    /// The pagination loop guard tripped before the server stopped
    /// returning continuation cursors.
    #[error("Pagination aborted: {0}")]
    Pagination(String),
}

/// One entry of a structured API error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Structured error-response body: `{"errors": [{code, status, title, detail}]}`.
///
/// Kept whole so callers can inspect individual entries' `code`/`status`
/// instead of string-matching the rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "API request failed");
        }
        let rendered: Vec<String> = self
            .errors
            .iter()
            .map(|e| {
                let title = e.title.as_deref().unwrap_or("Request failed");
                match e.detail.as_deref() {
                    Some(detail) => format!("{} - {}", title, detail),
                    None => title.to_string(),
                }
            })
            .collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_display_joins_entries() {
        let body: ErrorResponse = serde_json::from_value(serde_json::json!({
            "errors": [
                {"code": "NOT_FOUND", "status": "404", "title": "Not found",
                 "detail": "There is no resource with id 'X'"},
                {"code": "FORBIDDEN", "status": "403", "title": "Forbidden"}
            ]
        }))
        .unwrap();

        let rendered = body.to_string();
        assert!(rendered.contains("Not found - There is no resource with id 'X'"));
        assert!(rendered.contains("Forbidden"));
        assert_eq!(body.errors[0].code.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn empty_error_response_has_fallback_message() {
        let body = ErrorResponse::default();
        assert_eq!(body.to_string(), "API request failed");
    }
}
