//! Error types

mod api;
mod checker;
mod submit;

pub use api::*;
pub use checker::*;
pub use submit::*;

/// Top-level error for fallible panel operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A call to the panel backend failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A remote uniqueness check failed.
    #[error(transparent)]
    Checker(#[from] CheckerError),

    /// Saving the user form failed or was refused.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Signing in failed or was refused.
    #[error(transparent)]
    SignIn(#[from] SignInError),
}
