//! Submit flows of the user dialog and the sign-in screen.

mod common;

use std::sync::{Arc, Mutex};

use adminpanel_lib::error::{ApiError, SignInError, SubmitError};
use adminpanel_lib::forms::{AuthApi, REJECTED_MESSAGE, SignInForm, UserForm, UserStore};
use adminpanel_lib::model::{UserDraft, UserRecord};
use adminpanel_lib::notify::{ChannelNotifier, Notice};
use adminpanel_lib::session::{FormValidationSession, SessionConfig};
use adminpanel_lib::toast::{Toast, ToastLevel};
use adminpanel_lib::validation::Field;
use async_trait::async_trait;
use common::{ScriptedChecker, settle};
use tokio::sync::mpsc::UnboundedReceiver;

fn toasts(rx: &mut UnboundedReceiver<Notice>) -> Vec<Toast> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        if let Notice::Toast(toast) = notice {
            out.push(toast);
        }
    }
    out
}

// =============================================================================
// User dialog
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum StoreCall {
    Create(UserDraft),
    Update(i64, UserDraft),
}

#[derive(Default)]
struct MockStore {
    calls: Mutex<Vec<StoreCall>>,
    fail_with: Option<u16>,
}

impl MockStore {
    fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), ApiError> {
        match self.fail_with {
            Some(status) => Err(ApiError::http(status, "boom")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for MockStore {
    async fn submit_create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Create(draft.clone()));
        self.outcome()
    }

    async fn submit_update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Update(id, draft.clone()));
        self.outcome()
    }
}

fn user_form(
    store: Arc<MockStore>,
    checker: ScriptedChecker,
) -> (UserForm, UnboundedReceiver<Notice>) {
    let (notifier, rx) = ChannelNotifier::new();
    let notifier = Arc::new(notifier);
    let session = FormValidationSession::builder(SessionConfig::user_form())
        .checker(Arc::new(checker))
        .notifier(notifier.clone())
        .build();
    (UserForm::new(session, store, notifier), rx)
}

fn fill(form: &UserForm, name: &str, password: &str, role: &str) {
    let session = form.session();
    session.on_field_change(Field::Name, name);
    session.on_field_change(Field::Password, password);
    session.on_select_change(Field::Role, role);
}

fn ana() -> UserRecord {
    UserRecord {
        id: 7,
        name: "Ana Gomez".to_string(),
        email: None,
        role_id: Some(2),
        active: true,
    }
}

#[tokio::test(start_paused = true)]
async fn test_rejected_save_shows_one_toast_and_keeps_errors() {
    let store = Arc::new(MockStore::default());
    let (mut form, mut rx) = user_form(store.clone(), ScriptedChecker::new());
    form.open_create();

    let err = form.save().await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected));
    assert!(store.calls().is_empty());
    assert_eq!(toasts(&mut rx), vec![Toast::error(REJECTED_MESSAGE)]);
    assert_eq!(form.session().error(Field::Name), "Name is required.");
}

#[tokio::test(start_paused = true)]
async fn test_taken_name_is_rejected() {
    let store = Arc::new(MockStore::default());
    let checker = ScriptedChecker::new().answer("Ana Gomez", common::CHECK_LATENCY, true);
    let (mut form, mut rx) = user_form(store.clone(), checker);
    form.open_create();
    fill(&form, "Ana Gomez", "Abcd1234!", "2");

    // Saving before the debounce fires still waits for the check.
    let err = form.save().await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected));
    assert!(store.calls().is_empty());
    assert_eq!(toasts(&mut rx).len(), 1);
    assert_eq!(form.session().error(Field::Name), "Name already exists.");
}

#[tokio::test(start_paused = true)]
async fn test_create_sends_password_and_closes() {
    let store = Arc::new(MockStore::default());
    let (mut form, mut rx) = user_form(store.clone(), ScriptedChecker::new());
    form.open_create();
    fill(&form, "Ana Gomez", "Abcd1234!", "2");
    settle().await;

    form.save().await.unwrap();

    assert_eq!(
        store.calls(),
        vec![StoreCall::Create(UserDraft {
            name: "Ana Gomez".to_string(),
            password: Some("Abcd1234!".to_string()),
            role_id: "2".to_string(),
        })]
    );
    assert_eq!(
        toasts(&mut rx),
        vec![Toast::success("User created successfully.")]
    );
    assert_eq!(form.session().value(Field::Name), "");
    assert!(form.session().errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_edit_updates_without_password() {
    let store = Arc::new(MockStore::default());
    let (mut form, mut rx) = user_form(store.clone(), ScriptedChecker::new());

    form.open_edit(&ana());
    assert_eq!(form.editing(), Some(7));
    assert!(form.session().edit_mode());
    assert_eq!(form.session().value(Field::Role), "2");

    form.session().on_field_change(Field::Name, "Ana Maria");
    settle().await;
    form.save().await.unwrap();

    assert_eq!(
        store.calls(),
        vec![StoreCall::Update(
            7,
            UserDraft {
                name: "Ana Maria".to_string(),
                password: None,
                role_id: "2".to_string(),
            }
        )]
    );
    assert_eq!(
        toasts(&mut rx),
        vec![Toast::success("User updated successfully.")]
    );
    assert_eq!(form.editing(), None);
}

#[tokio::test(start_paused = true)]
async fn test_untouched_edit_saves() {
    let store = Arc::new(MockStore::default());
    // The user's own record is in the collection.
    let checker = ScriptedChecker::new().answer("Ana Gomez", common::CHECK_LATENCY, true);
    let (mut form, mut rx) = user_form(store.clone(), checker);

    form.open_edit(&ana());
    form.save().await.unwrap();

    assert_eq!(
        store.calls(),
        vec![StoreCall::Update(
            7,
            UserDraft {
                name: "Ana Gomez".to_string(),
                password: None,
                role_id: "2".to_string(),
            }
        )]
    );
    assert_eq!(
        toasts(&mut rx),
        vec![Toast::success("User updated successfully.")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_edit_rename_to_taken_name_is_rejected() {
    let store = Arc::new(MockStore::default());
    let checker = ScriptedChecker::new().answer("Luis Perez", common::CHECK_LATENCY, true);
    let (mut form, _rx) = user_form(store.clone(), checker);

    form.open_edit(&ana());
    form.session().on_field_change(Field::Name, "Luis Perez");
    let err = form.save().await.unwrap_err();

    assert!(matches!(err, SubmitError::Rejected));
    assert!(store.calls().is_empty());
    assert_eq!(form.session().error(Field::Name), "Name already exists.");
}

#[tokio::test(start_paused = true)]
async fn test_save_failure_is_reported_once() {
    let store = Arc::new(MockStore::failing(500));
    let (mut form, mut rx) = user_form(store.clone(), ScriptedChecker::new());
    form.open_create();
    fill(&form, "Ana Gomez", "Abcd1234!", "2");
    settle().await;

    let err = form.save().await.unwrap_err();

    assert!(matches!(err, SubmitError::SaveFailed(ApiError::Http { status: 500, .. })));
    let shown = toasts(&mut rx);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].level, ToastLevel::Error);
    assert_eq!(shown[0].message, "Error saving user. Please try again.");
    // The dialog stays open with the user's input.
    assert_eq!(form.session().value(Field::Name), "Ana Gomez");
}

#[tokio::test(start_paused = true)]
async fn test_close_discards_outstanding_check() {
    let store = Arc::new(MockStore::default());
    let checker = ScriptedChecker::new().answer("Ana Gomez", common::CHECK_LATENCY, true);
    let (mut form, _rx) = user_form(store, checker);
    form.open_create();
    form.session().on_field_change(Field::Name, "Ana Gomez");
    form.close();
    settle().await;

    assert!(form.session().errors().is_empty());
}

// =============================================================================
// Sign-in
// =============================================================================

#[derive(Default)]
struct MockAuth {
    users: Vec<UserRecord>,
    reject: bool,
    logins: Mutex<Vec<(String, String)>>,
    tokens_seen: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthApi for MockAuth {
    async fn authenticate(&self, name: &str, password: &str) -> Result<String, ApiError> {
        self.logins
            .lock()
            .unwrap()
            .push((name.to_string(), password.to_string()));
        if self.reject {
            Err(ApiError::http(401, "invalid credentials"))
        } else {
            Ok("tok-123".to_string())
        }
    }

    async fn fetch_users_with_token(&self, token: &str) -> Result<Vec<UserRecord>, ApiError> {
        self.tokens_seen.lock().unwrap().push(token.to_string());
        Ok(self.users.clone())
    }
}

fn sign_in(auth: Arc<MockAuth>) -> (SignInForm, UnboundedReceiver<Notice>) {
    let (notifier, rx) = ChannelNotifier::new();
    let session = FormValidationSession::new(SessionConfig::sign_in());
    (SignInForm::new(session, auth, Arc::new(notifier)), rx)
}

fn type_credentials(form: &SignInForm, name: &str, password: &str) {
    form.session().on_field_change(Field::Name, name);
    form.session().on_field_change(Field::Password, password);
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_success() {
    let auth = Arc::new(MockAuth {
        users: vec![ana()],
        ..MockAuth::default()
    });
    let (form, mut rx) = sign_in(auth.clone());
    type_credentials(&form, "Ana Gomez", "secret");

    let outcome = form.submit().await.unwrap();

    assert_eq!(outcome.token, "tok-123");
    assert_eq!(outcome.user.id, 7);
    assert_eq!(*auth.tokens_seen.lock().unwrap(), vec!["tok-123"]);
    assert_eq!(toasts(&mut rx), vec![Toast::success("Access granted.")]);
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_rejected_without_calling_backend() {
    let auth = Arc::new(MockAuth::default());
    let (form, mut rx) = sign_in(auth.clone());
    type_credentials(&form, "An", "abc");

    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, SignInError::Rejected));
    assert!(auth.logins.lock().unwrap().is_empty());
    assert_eq!(toasts(&mut rx), vec![Toast::error(REJECTED_MESSAGE)]);
    assert_eq!(
        form.session().error(Field::Name),
        "Name must be between 3 and 50 characters."
    );
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_invalid_credentials() {
    let auth = Arc::new(MockAuth {
        reject: true,
        ..MockAuth::default()
    });
    let (form, mut rx) = sign_in(auth);
    type_credentials(&form, "Ana Gomez", "wrong");

    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, SignInError::InvalidCredentials(_)));
    assert_eq!(
        toasts(&mut rx),
        vec![Toast::error("Invalid credentials. Please try again.")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_inactive_user() {
    let mut user = ana();
    user.active = false;
    let auth = Arc::new(MockAuth {
        users: vec![user],
        ..MockAuth::default()
    });
    let (form, mut rx) = sign_in(auth);
    type_credentials(&form, "Ana Gomez", "secret");

    let err = form.submit().await.unwrap_err();

    assert!(matches!(err, SignInError::Inactive { .. }));
    let shown = toasts(&mut rx);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].level, ToastLevel::Error);
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_unknown_user() {
    let auth = Arc::new(MockAuth::default());
    let (form, _rx) = sign_in(auth);
    type_credentials(&form, "Ana Gomez", "secret");

    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, SignInError::UnknownUser { name } if name == "Ana Gomez"));
}
