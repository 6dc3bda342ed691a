//! Sign-in screen.

use std::sync::Arc;

use async_trait::async_trait;

use super::REJECTED_MESSAGE;
use crate::error::{ApiError, SignInError};
use crate::model::UserRecord;
use crate::notify::Notifier;
use crate::session::FormValidationSession;
use crate::toast::Toast;
use crate::validation::{Field, FormKind};

const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";

/// Login endpoints used by the sign-in screen.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn authenticate(&self, name: &str, password: &str) -> Result<String, ApiError>;

    /// List users, authorised with `token`.
    async fn fetch_users_with_token(&self, token: &str) -> Result<Vec<UserRecord>, ApiError>;
}

/// A successful sign-in. Keeping the token is up to the caller.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub token: String,
    pub user: UserRecord,
}

/// The sign-in screen.
pub struct SignInForm {
    session: FormValidationSession,
    auth: Arc<dyn AuthApi>,
    notifier: Arc<dyn Notifier>,
}

impl SignInForm {
    /// Wrap a sign-in session.
    pub fn new(
        session: FormValidationSession,
        auth: Arc<dyn AuthApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        debug_assert_eq!(session.form(), FormKind::SignIn);
        Self {
            session,
            auth,
            notifier,
        }
    }

    /// The validation session backing the screen.
    pub fn session(&self) -> &FormValidationSession {
        &self.session
    }

    /// Validate and sign in. Exactly one toast is shown either way.
    pub async fn submit(&self) -> Result<SignInOutcome, SignInError> {
        if !self.session.can_submit() {
            self.notifier.toast(Toast::error(REJECTED_MESSAGE));
            return Err(SignInError::Rejected);
        }

        let name = self.session.value(Field::Name);
        let password = self.session.value(Field::Password);

        let token = match self.auth.authenticate(&name, &password).await {
            Ok(token) => token,
            Err(e) => {
                log::warn!("[sign_in] login for {name:?} failed: {e}");
                self.notifier.toast(Toast::error(INVALID_CREDENTIALS));
                return Err(SignInError::InvalidCredentials(e));
            }
        };

        let users = match self.auth.fetch_users_with_token(&token).await {
            Ok(users) => users,
            Err(e) => {
                log::error!("[sign_in] loading users failed: {e}");
                self.notifier.toast(Toast::error(INVALID_CREDENTIALS));
                return Err(SignInError::UserLookup(e));
            }
        };

        let Some(user) = users.into_iter().find(|u| u.name == name) else {
            self.notifier.toast(Toast::error(INVALID_CREDENTIALS));
            return Err(SignInError::UnknownUser { name });
        };

        if !user.active {
            self.notifier.toast(Toast::error(
                "User inactive. Please contact the administrator to regain access.",
            ));
            return Err(SignInError::Inactive { name });
        }

        log::info!("[sign_in] {name:?} signed in");
        self.notifier.toast(Toast::success("Access granted."));
        Ok(SignInOutcome { token, user })
    }
}
