//! Error types for the Speshits client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for Speshits operations
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Top-level error type for the client
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied arguments violate an operation precondition.
    /// Raised before any network activity.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Transport-level failure (connection refused, connect or read timeout).
    /// The underlying `reqwest::Error` is kept so callers see the real
    /// network failure after retries are exhausted.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response on a data call.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    /// The token exchange itself was rejected.
    #[error("Authentication failed (HTTP {status}): {body}")]
    Authentication { status: StatusCode, body: String },

    /// The response envelope reported `success: false`.
    /// Displays exactly the server-supplied message.
    #[error("{0}")]
    Api(String),

    /// The response body could not be parsed as the expected envelope.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Whether this failure is retry-safe at the transport level.
    ///
    /// Only connection failures and timeouts qualify; HTTP status errors
    /// and application-level rejections never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }

    /// Build an `HttpStatus` error from a response status and body,
    /// truncating oversized bodies.
    pub(crate) fn http_status(status: StatusCode, body: String) -> Self {
        Error::HttpStatus {
            status,
            body: truncate_body(&body),
        }
    }

    /// Build an `Authentication` error from a token-endpoint rejection.
    pub(crate) fn authentication(status: StatusCode, body: String) -> Self {
        Error::Authentication {
            status,
            body: truncate_body(&body),
        }
    }
}

/// Truncate a response body to avoid carrying excessive data in errors
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..MAX_ERROR_BODY_LENGTH],
            body.len()
        )
    }
}
