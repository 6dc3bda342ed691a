//! API error types

use std::time::Duration;

/// Errors that can occur while talking to the panel backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP response.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Network error during the call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid base URL or path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response body.
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

    /// Returns `true` if the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
