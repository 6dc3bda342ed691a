//! Submit flows of the two panel forms.
//!
//! Each form wraps a [`FormValidationSession`](crate::session::FormValidationSession)
//! and turns a submit attempt into at most one backend call and exactly one
//! toast.

mod sign_in;
mod user_form;

pub use sign_in::{AuthApi, SignInForm, SignInOutcome};
pub use user_form::{UserForm, UserStore};

/// Toast shown when the submit gate refuses a form.
pub const REJECTED_MESSAGE: &str = "Please complete all fields correctly.";
