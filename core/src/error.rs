//! Error types for the API test client.
//!
//! # Design
//! Every failure mode a test caller can meaningfully distinguish gets its
//! own variant. Nothing is retried or recovered internally; a dispatch
//! either returns a typed response or one of these, and a test that hits
//! one is expected to end.

use std::fmt;

/// Errors returned by `ApiClient::dispatch`.
#[derive(Debug)]
pub enum ApiError {
    /// The underlying transport failed (DNS, connect, TLS, body read).
    /// Carries the ureq error unmodified.
    Transport(ureq::Error),

    /// The response status code was not in the descriptor's expected set.
    /// The body is included for debugging; deserialization was not attempted.
    UnexpectedStatus {
        status: u16,
        expected: Vec<u16>,
        body: String,
    },

    /// The response body was not valid JSON.
    InvalidJson(serde_json::Error),

    /// The response JSON did not match the requested shape.
    Deserialization(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "transport error: {e}"),
            ApiError::UnexpectedStatus {
                status,
                expected,
                body,
            } => {
                write!(
                    f,
                    "unexpected status {status}, expected one of {expected:?}: {body}"
                )
            }
            ApiError::InvalidJson(e) => write!(f, "response body is not JSON: {e}"),
            ApiError::Deserialization(e) => {
                write!(f, "deserialization failed: {e}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::InvalidJson(e) | ApiError::Deserialization(e) => Some(e),
            ApiError::UnexpectedStatus { .. } => None,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        ApiError::Transport(e)
    }
}
