//! Session configuration

use std::time::Duration;

use crate::validation::FormKind;

/// Configuration for a [`FormValidationSession`](super::FormValidationSession).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use adminpanel_lib::session::SessionConfig;
///
/// let config = SessionConfig::user_form()
///     .with_edit_mode(true)
///     .with_quiet_period(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Which form the session validates.
    pub form: FormKind,

    /// Debounce quiet period per field.
    ///
    /// Default: 300 ms for sign-in, 400 ms for the user form
    pub quiet_period: Duration,

    /// Editing an existing record; suppresses create-only rules.
    ///
    /// Default: false
    pub edit_mode: bool,
}

impl SessionConfig {
    /// Creates a config with the form's default quiet period.
    pub fn new(form: FormKind) -> Self {
        Self {
            form,
            quiet_period: form.default_quiet_period(),
            edit_mode: false,
        }
    }

    /// Config for the sign-in screen.
    pub fn sign_in() -> Self {
        Self::new(FormKind::SignIn)
    }

    /// Config for the user create/edit dialog.
    pub fn user_form() -> Self {
        Self::new(FormKind::UserForm)
    }

    /// Sets the debounce quiet period.
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Sets the initial edit mode.
    pub fn with_edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }
}
