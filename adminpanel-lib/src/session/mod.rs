//! Form validation sessions.
//!
//! A [`FormValidationSession`] owns the live values and visible errors of one
//! open form. Edits are debounced per field; fields declared
//! [`ValidationMode::SyncAndRemoteUnique`](crate::validation::ValidationMode)
//! are then checked remotely, and the result is applied only if it still
//! matches the field's current value.
//!
//! # Example
//!
//! ```ignore
//! let session = FormValidationSession::builder(SessionConfig::user_form())
//!     .checker(Arc::new(RemoteUniquenessChecker::new(client.clone())))
//!     .notifier(Arc::new(notifier))
//!     .build();
//!
//! session.on_field_change(Field::Name, "Ana Gomez");
//! // ... later, when the user presses save
//! if session.prepare_submit().await {
//!     // submit
//! }
//! ```

mod config;
mod debounce;

pub use config::SessionConfig;
pub use debounce::{DebounceToken, Debouncer};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Notify, broadcast, watch};

use crate::check::{RaceResolver, Resolution, UniquenessChecker, Verdict};
use crate::error::CheckerError;
use crate::notify::{LogNotifier, Notifier};
use crate::validation::{
    ErrorMap, Field, FieldError, FieldSpec, FieldStatus, FormKind, Phase, RuleContext, RuleSet,
    ValidationReport, ValidationResult,
};

const RESULT_CHANNEL_CAPACITY: usize = 64;

/// Validation state of one open form.
///
/// Cheap to clone; clones share the same state. Scheduling uses
/// `tokio::spawn`, so edits must be fed from inside a tokio runtime.
#[derive(Clone)]
pub struct FormValidationSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    form: FormKind,
    rules: RuleSet,
    checker: Option<Arc<dyn UniquenessChecker>>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
    errors_tx: watch::Sender<ErrorMap>,
    results_tx: broadcast::Sender<ValidationResult>,
    /// Woken whenever a remote check finishes or the session is reset.
    checks_settled: Notify,
}

struct SessionState {
    edit_mode: bool,
    values: HashMap<Field, String>,
    /// Values of the record being edited; they are not checked against
    /// themselves.
    originals: HashMap<Field, String>,
    errors: ErrorMap,
    statuses: HashMap<Field, FieldStatus>,
    debouncer: Debouncer,
    resolver: RaceResolver,
}

impl SessionState {
    fn value(&self, field: Field) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn ctx(&self) -> RuleContext {
        RuleContext {
            edit_mode: self.edit_mode,
        }
    }
}

/// What a pass still has to do after its synchronous part.
enum PassStart {
    Done,
    Remote(String),
}

/// Builder for [`FormValidationSession`].
pub struct SessionBuilder {
    config: SessionConfig,
    checker: Option<Arc<dyn UniquenessChecker>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl SessionBuilder {
    /// Sets the remote uniqueness checker.
    ///
    /// Without one, remote-unique fields are validated synchronously only.
    pub fn checker(mut self, checker: Arc<dyn UniquenessChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Sets where checker failures are reported. Defaults to [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the session.
    pub fn build(self) -> FormValidationSession {
        let form = self.config.form;
        let (errors_tx, _) = watch::channel(ErrorMap::new());
        let (results_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);

        FormValidationSession {
            inner: Arc::new(SessionInner {
                form,
                rules: form.rule_set(),
                checker: self.checker,
                notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
                state: Mutex::new(SessionState {
                    edit_mode: self.config.edit_mode,
                    values: HashMap::new(),
                    originals: HashMap::new(),
                    errors: ErrorMap::new(),
                    statuses: HashMap::new(),
                    debouncer: Debouncer::new(self.config.quiet_period),
                    resolver: RaceResolver::new(),
                }),
                errors_tx,
                results_tx,
                checks_settled: Notify::new(),
            }),
        }
    }
}

impl FormValidationSession {
    /// Creates a builder for a session with the given config.
    pub fn builder(config: SessionConfig) -> SessionBuilder {
        SessionBuilder {
            config,
            checker: None,
            notifier: None,
        }
    }

    /// Creates a session without a remote checker.
    pub fn new(config: SessionConfig) -> Self {
        Self::builder(config).build()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // View contract
    // =========================================================================

    /// The form this session validates.
    pub fn form(&self) -> FormKind {
        self.inner.form
    }

    /// Whether an existing record is being edited.
    pub fn edit_mode(&self) -> bool {
        self.state().edit_mode
    }

    /// Live value of `field`.
    pub fn value(&self, field: Field) -> String {
        self.state().value(field)
    }

    /// Visible error for `field`; empty when valid.
    pub fn error(&self, field: Field) -> String {
        self.state().errors.get(field).to_string()
    }

    /// Snapshot of all visible errors.
    pub fn errors(&self) -> ErrorMap {
        self.state().errors.clone()
    }

    /// Validation state of `field`.
    pub fn status(&self, field: Field) -> FieldStatus {
        self.state().statuses.get(&field).copied().unwrap_or_default()
    }

    /// Receiver that observes every change of the error map.
    pub fn subscribe_errors(&self) -> watch::Receiver<ErrorMap> {
        self.inner.errors_tx.subscribe()
    }

    /// Receiver for the results of asynchronous passes as they commit.
    pub fn subscribe_results(&self) -> broadcast::Receiver<ValidationResult> {
        self.inner.results_tx.subscribe()
    }

    // =========================================================================
    // Input events
    // =========================================================================

    /// Record a keystroke-level edit and schedule a debounced pass.
    ///
    /// The value is applied immediately; validation runs once the field has
    /// been quiet for the configured period.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn on_field_change(&self, field: Field, value: impl Into<String>) {
        if self.inner.form.spec(field).is_none() {
            log::warn!("[session] {:?} has no field {field}", self.inner.form);
            return;
        }

        let (token, quiet_period) = {
            let mut st = self.state();
            st.values.insert(field, value.into());
            st.statuses.insert(field, FieldStatus::Validating(Phase::Sync));
            (st.debouncer.schedule(field), st.debouncer.quiet_period())
        };

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            session.run_debounced(token).await;
        });
    }

    /// Record a selection change and validate it right away.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime and `field` is checked remotely.
    pub fn on_select_change(&self, field: Field, value: impl Into<String>) {
        let Some(spec) = self.inner.form.spec(field) else {
            log::warn!("[session] {:?} has no field {field}", self.inner.form);
            return;
        };

        let value = value.into();
        let start = {
            let mut st = self.state();
            st.values.insert(field, value.clone());
            // A pending keystroke pass would only re-validate an older value.
            st.debouncer.schedule(field);
            self.begin_pass(&mut st, spec, &value)
        };

        if let PassStart::Remote(value) = start {
            let session = self.clone();
            tokio::spawn(async move { session.run_remote_check(field, value).await });
        }
    }

    /// Run every synchronous rule now, bypassing the debounce.
    ///
    /// Remote verdicts already committed for the current values are kept;
    /// fields whose check is still outstanding show no error.
    pub fn on_blur_or_submit_attempt(&self) -> ValidationReport {
        let mut st = self.state();
        let ctx = st.ctx();
        let mut errors = Vec::new();

        for spec in self.inner.form.fields() {
            let field = spec.field;
            let value = st.value(field);

            let error = match self.inner.rules.check(field, &value, ctx) {
                Some(msg) => Some(msg),
                None if self.checks_remotely(&st, spec, &value) => {
                    match st.resolver.verdict_for(field, &value) {
                        Some(Verdict::Taken) => Some(taken_message(field)),
                        _ => None,
                    }
                }
                None => None,
            };

            let status = if error.is_some() {
                FieldStatus::Invalid
            } else if self.checks_remotely(&st, spec, &value)
                && st.resolver.verdict_for(field, &value).is_none()
            {
                FieldStatus::Validating(Phase::Remote)
            } else {
                FieldStatus::Valid
            };
            st.statuses.insert(field, status);

            if let Some(message) = error.as_ref().filter(|_| spec.required) {
                errors.push(FieldError {
                    field,
                    message: message.clone(),
                });
            }
            st.errors.set(field, error);
        }

        self.publish_errors(&st);
        ValidationReport::from_errors(errors)
    }

    /// Submit gate: a full immediate pass, then `true` only if no required
    /// field has an error and every remote check for the current values has
    /// been committed.
    pub fn can_submit(&self) -> bool {
        if self.on_blur_or_submit_attempt().is_invalid() {
            return false;
        }

        let st = self.state();
        self.inner
            .form
            .fields()
            .iter()
            .filter(|spec| spec.required)
            .all(|spec| {
                let value = st.value(spec.field);
                !self.checks_remotely(&st, spec, &value)
                    || st.resolver.verdict_for(spec.field, &value).is_some()
            })
    }

    /// Settle outstanding uniqueness checks for the current values, then
    /// apply the submit gate.
    ///
    /// A check already in flight for the current value is awaited rather
    /// than issued again; pending debounced passes for checked fields are
    /// superseded.
    pub async fn prepare_submit(&self) -> bool {
        self.on_blur_or_submit_attempt();

        let mut jobs = Vec::new();
        let mut in_flight = Vec::new();
        {
            let mut st = self.state();
            let ctx = st.ctx();
            for spec in self.inner.form.fields() {
                let field = spec.field;
                let value = st.value(field);
                if !self.checks_remotely(&st, spec, &value)
                    || self.inner.rules.check(field, &value, ctx).is_some()
                    || st.resolver.verdict_for(field, &value).is_some()
                {
                    continue;
                }
                st.debouncer.supersede(field);
                if st.resolver.is_pending(field, &value) {
                    in_flight.push((field, value));
                } else {
                    st.resolver.request(field, value.clone());
                    jobs.push((field, value));
                }
            }
        }

        for (field, value) in jobs {
            self.run_remote_check(field, value).await;
        }
        for (field, value) in in_flight {
            self.await_check(field, &value).await;
        }

        self.can_submit()
    }

    /// Wait until the check for `value` commits, goes stale or the field
    /// moves on.
    async fn await_check(&self, field: Field, value: &str) {
        loop {
            let settled = self.inner.checks_settled.notified();
            tokio::pin!(settled);
            // Register before looking at the state so a wakeup is not missed.
            settled.as_mut().enable();
            {
                let st = self.state();
                if !st.resolver.is_pending(field, value) || st.value(field) != value {
                    return;
                }
            }
            log::trace!("[session] waiting for in-flight check of {field}={value:?}");
            settled.await;
        }
    }

    /// Clear values, errors and outstanding work.
    ///
    /// Passes and checks still in flight become stale and are discarded.
    pub fn reset(&self, edit_mode: bool) {
        self.reset_with(edit_mode, std::iter::empty());
    }

    /// Like [`reset`](Self::reset), pre-filling the given values without
    /// validating them.
    pub fn reset_with(&self, edit_mode: bool, values: impl IntoIterator<Item = (Field, String)>) {
        let mut st = self.state();
        st.edit_mode = edit_mode;
        st.values = values.into_iter().collect();
        st.originals = if edit_mode {
            st.values.clone()
        } else {
            HashMap::new()
        };
        st.errors = ErrorMap::new();
        st.statuses.clear();
        st.debouncer.supersede_all();
        st.resolver.reset();
        self.publish_errors(&st);
        drop(st);
        self.inner.checks_settled.notify_waiters();
        log::debug!("[session] reset {:?} (edit_mode={edit_mode})", self.inner.form);
    }

    // =========================================================================
    // Passes
    // =========================================================================

    async fn run_debounced(&self, token: DebounceToken) {
        let field = token.field;
        let start = {
            let mut st = self.state();
            if !st.debouncer.is_current(token) {
                log::trace!("[session] pass for {field} superseded");
                return;
            }
            let Some(spec) = self.inner.form.spec(field) else {
                return;
            };
            let value = st.value(field);
            self.begin_pass(&mut st, spec, &value)
        };

        if let PassStart::Remote(value) = start {
            self.run_remote_check(field, value).await;
        }
    }

    /// Synchronous half of a pass. Caller holds the state lock.
    fn begin_pass(&self, st: &mut SessionState, spec: FieldSpec, value: &str) -> PassStart {
        let field = spec.field;

        if let Some(msg) = self.inner.rules.check(field, value, st.ctx()) {
            self.commit(st, field, value, Some(msg));
            return PassStart::Done;
        }

        if self.checks_remotely(st, &spec, value) {
            st.statuses.insert(field, FieldStatus::Validating(Phase::Remote));
            if st.errors.clear(field) {
                self.publish_errors(st);
            }
            if st.resolver.is_pending(field, value) {
                log::trace!("[session] check for {field}={value:?} already in flight");
                return PassStart::Done;
            }
            st.resolver.request(field, value);
            return PassStart::Remote(value.to_string());
        }

        self.commit(st, field, value, None);
        PassStart::Done
    }

    async fn run_remote_check(&self, field: Field, value: String) {
        let Some(checker) = self.inner.checker.clone() else {
            return;
        };
        log::debug!("[session] checking {field}={value:?} remotely");
        let result = checker.check_exists(field.remote_key(), &value).await;
        self.apply_remote(field, &value, result);
    }

    /// Apply a finished remote check if it still matches the field.
    fn apply_remote(&self, field: Field, value: &str, result: Result<bool, CheckerError>) {
        let failure = {
            let mut st = self.state();
            let live = st.value(field);

            if st.resolver.resolve(field, value, &live) == Resolution::Stale {
                match &result {
                    Ok(_) => log::trace!("[session] stale check for {field}={value:?} dropped"),
                    Err(e) => log::warn!("[session] stale check for {field}={value:?} failed: {e}"),
                }
                None
            } else {
                match result {
                    Ok(true) => {
                        st.resolver.commit(field, value, Verdict::Taken);
                        self.commit(&mut st, field, value, Some(taken_message(field)));
                        None
                    }
                    Ok(false) => {
                        st.resolver.commit(field, value, Verdict::Unique);
                        self.commit(&mut st, field, value, None);
                        None
                    }
                    Err(e) => {
                        // Fail open: the user is not blocked by a broken checker.
                        st.resolver.commit(field, value, Verdict::Unverified);
                        self.commit(&mut st, field, value, None);
                        Some(e)
                    }
                }
            }
        };
        self.inner.checks_settled.notify_waiters();

        if let Some(e) = failure {
            log::error!("[session] uniqueness check for {field} failed: {e}");
            self.inner
                .notifier
                .report_error(&format!("checking whether {} exists", field.as_str()), &e);
        }
    }

    /// Make `error` the visible outcome for `field` and announce it.
    fn commit(&self, st: &mut SessionState, field: Field, value: &str, error: Option<String>) {
        let status = if error.is_some() {
            FieldStatus::Invalid
        } else {
            FieldStatus::Valid
        };
        st.statuses.insert(field, status);
        if st.errors.set(field, error.clone()) {
            self.publish_errors(st);
        }
        // No subscribers is fine.
        let _ = self.inner.results_tx.send(ValidationResult {
            field,
            value: value.to_string(),
            error,
        });
    }

    fn publish_errors(&self, st: &SessionState) {
        self.inner.errors_tx.send_replace(st.errors.clone());
    }

    fn checks_remotely(&self, st: &SessionState, spec: &FieldSpec, value: &str) -> bool {
        spec.is_remote()
            && !value.is_empty()
            && self.inner.checker.is_some()
            && st.originals.get(&spec.field).map(String::as_str) != Some(value)
    }
}

impl std::fmt::Debug for FormValidationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state();
        f.debug_struct("FormValidationSession")
            .field("form", &self.inner.form)
            .field("edit_mode", &st.edit_mode)
            .field("errors", &st.errors)
            .finish()
    }
}

fn taken_message(field: Field) -> String {
    format!("{} already exists.", field.label())
}
