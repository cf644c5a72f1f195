//! Error types for backend calls.

use thiserror::Error;

/// Errors returned by an [`AnnotationBackend`](super::AnnotationBackend).
///
/// None of these are fatal: callers keep their local state so the user can
/// retry by hand.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never reached the server or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Server returned {code}: {message}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Message from the response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A newer request superseded this one, or its view went away
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }
}
