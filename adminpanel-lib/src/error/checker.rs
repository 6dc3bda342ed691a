//! Uniqueness checker error types

use super::ApiError;

/// Errors raised by a remote uniqueness check.
///
/// These never become field errors. The session clears the field (fail-open)
/// and reports the failure through its notifier.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    /// Fetching the record collection failed.
    #[error("uniqueness check transport failure: {0}")]
    Transport(#[from] ApiError),
}
