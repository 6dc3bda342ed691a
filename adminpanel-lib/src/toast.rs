use std::time::Duration;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A user-facing notification.
///
/// # Example
///
/// ```
/// use adminpanel_lib::toast::{Toast, ToastLevel};
///
/// let toast = Toast::error("Error saving user. Please try again.");
/// assert_eq!(toast.level, ToastLevel::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// How long to show the toast.
    pub duration: Duration,
}

impl Toast {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Create a success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    /// Create an error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }
}
