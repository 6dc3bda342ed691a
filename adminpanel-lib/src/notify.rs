//! Notification seam between the forms and the host application.

use tokio::sync::mpsc;

use crate::toast::Toast;

/// Something the host should show or record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A toast for the user.
    Toast(Toast),
    /// A recoverable failure for the host's error channel.
    Error {
        /// What was being attempted.
        context: String,
        /// Rendered error.
        message: String,
    },
}

/// Receives toasts and error reports from the forms.
pub trait Notifier: Send + Sync {
    /// Show a toast to the user.
    fn toast(&self, toast: Toast);

    /// Report a recoverable failure that has no other visible effect.
    fn report_error(&self, context: &str, error: &(dyn std::error::Error + 'static));
}

/// Notifier that forwards everything to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the host drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            log::debug!("[notify] receiver dropped, notice discarded");
        }
    }
}

impl Notifier for ChannelNotifier {
    fn toast(&self, toast: Toast) {
        self.send(Notice::Toast(toast));
    }

    fn report_error(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        self.send(Notice::Error {
            context: context.to_string(),
            message: error.to_string(),
        });
    }
}

/// Notifier that only logs. Used when the host does not listen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn toast(&self, toast: Toast) {
        log::info!("[toast] {:?}: {}", toast.level, toast.message);
    }

    fn report_error(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        log::error!("[notify] {context}: {error}");
    }
}
