//! User create/edit dialog.

use std::sync::Arc;

use async_trait::async_trait;

use super::REJECTED_MESSAGE;
use crate::error::{ApiError, SubmitError};
use crate::model::{UserDraft, UserRecord};
use crate::notify::Notifier;
use crate::session::FormValidationSession;
use crate::toast::Toast;
use crate::validation::{Field, FormKind};

const SAVE_FAILED: &str = "Error saving user. Please try again.";

/// Persists users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user.
    async fn submit_create(&self, draft: &UserDraft) -> Result<(), ApiError>;

    /// Update user `id`.
    async fn submit_update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError>;
}

/// The user create/edit dialog.
///
/// Feed edits through [`session`](Self::session); call [`save`](Self::save)
/// when the user confirms.
pub struct UserForm {
    session: FormValidationSession,
    store: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    editing: Option<i64>,
}

impl UserForm {
    /// Wrap a user-form session.
    pub fn new(
        session: FormValidationSession,
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        debug_assert_eq!(session.form(), FormKind::UserForm);
        Self {
            session,
            store,
            notifier,
            editing: None,
        }
    }

    /// The validation session backing the dialog.
    pub fn session(&self) -> &FormValidationSession {
        &self.session
    }

    /// Id of the user being edited, if any.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Open blank, for creating a user.
    pub fn open_create(&mut self) {
        self.editing = None;
        self.session.reset(false);
    }

    /// Open pre-filled with `user`; password rules are suppressed.
    pub fn open_edit(&mut self, user: &UserRecord) {
        self.editing = Some(user.id);
        let role = user.role_id.map(|id| id.to_string()).unwrap_or_default();
        self.session.reset_with(
            true,
            [(Field::Name, user.name.clone()), (Field::Role, role)],
        );
    }

    /// Close the dialog, discarding values, errors and outstanding checks.
    pub fn close(&mut self) {
        self.editing = None;
        self.session.reset(false);
    }

    /// Payload built from the current values.
    pub fn draft(&self) -> UserDraft {
        let password = if self.session.edit_mode() {
            None
        } else {
            Some(self.session.value(Field::Password))
        };
        UserDraft {
            name: self.session.value(Field::Name),
            password,
            role_id: self.session.value(Field::Role),
        }
    }

    /// Validate and, if the gate passes, create or update the user.
    ///
    /// Closes the dialog on success. Exactly one toast is shown either way.
    pub async fn save(&mut self) -> Result<(), SubmitError> {
        if !self.session.prepare_submit().await {
            self.notifier.toast(Toast::error(REJECTED_MESSAGE));
            return Err(SubmitError::Rejected);
        }

        let draft = self.draft();
        let (result, success) = match (self.session.edit_mode(), self.editing) {
            (true, Some(id)) => (
                self.store.submit_update(id, &draft).await,
                "User updated successfully.",
            ),
            (true, None) => {
                self.notifier.toast(Toast::error(SAVE_FAILED));
                return Err(SubmitError::MissingId);
            }
            (false, _) => (
                self.store.submit_create(&draft).await,
                "User created successfully.",
            ),
        };

        match result {
            Ok(()) => {
                self.notifier.toast(Toast::success(success));
                self.close();
                Ok(())
            }
            Err(e) => {
                log::error!("[user_form] saving {:?} failed: {e}", draft.name);
                self.notifier.toast(Toast::error(SAVE_FAILED));
                Err(SubmitError::SaveFailed(e))
            }
        }
    }
}
