//! Form submission error types

use super::ApiError;

/// Errors returned when saving the user form.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The submit gate refused the form; field errors remain visible.
    #[error("form has invalid fields")]
    Rejected,

    /// The create or update call failed.
    #[error("save failed: {0}")]
    SaveFailed(#[source] ApiError),

    /// Edit mode was requested without a record id.
    #[error("no record selected for update")]
    MissingId,
}

/// Errors returned when submitting the sign-in form.
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// The submit gate refused the form.
    #[error("form has invalid fields")]
    Rejected,

    /// The backend refused the credentials or the login call failed.
    #[error("invalid credentials")]
    InvalidCredentials(#[source] ApiError),

    /// Looking up the signed-in user failed.
    #[error("failed to load user: {0}")]
    UserLookup(#[source] ApiError),

    /// The login succeeded but no user with that name was listed.
    #[error("user '{name}' not found")]
    UnknownUser { name: String },

    /// The account exists but is disabled.
    #[error("user '{name}' is inactive")]
    Inactive { name: String },
}
