//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adminpanel_lib::check::UniquenessChecker;
use adminpanel_lib::error::{ApiError, CheckerError};
use adminpanel_lib::notify::{ChannelNotifier, Notice};
use adminpanel_lib::session::{FormValidationSession, SessionConfig};
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

/// Default latency of a scripted check.
pub const CHECK_LATENCY: Duration = Duration::from_millis(10);

/// Checker whose latency and answer are scripted per value.
#[derive(Default)]
pub struct ScriptedChecker {
    script: HashMap<String, (Duration, Result<bool, u16>)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `exists` for `value` after `delay`.
    pub fn answer(mut self, value: &str, delay: Duration, exists: bool) -> Self {
        self.script.insert(value.to_string(), (delay, Ok(exists)));
        self
    }

    /// Fail with HTTP `status` for `value` after `delay`.
    pub fn fail(mut self, value: &str, delay: Duration, status: u16) -> Self {
        self.script.insert(value.to_string(), (delay, Err(status)));
        self
    }

    /// Values checked so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UniquenessChecker for ScriptedChecker {
    async fn check_exists(&self, field: &str, value: &str) -> Result<bool, CheckerError> {
        assert_eq!(field, "nombre");
        self.calls.lock().unwrap().push(value.to_string());
        let (delay, outcome) = self
            .script
            .get(value)
            .cloned()
            .unwrap_or((CHECK_LATENCY, Ok(false)));
        tokio::time::sleep(delay).await;
        outcome.map_err(|status| CheckerError::Transport(ApiError::http(status, "unavailable")))
    }
}

pub struct Harness {
    pub session: FormValidationSession,
    pub checker: Arc<ScriptedChecker>,
    pub notices: UnboundedReceiver<Notice>,
    pub notifier: Arc<ChannelNotifier>,
}

impl Harness {
    pub fn new(config: SessionConfig, checker: ScriptedChecker) -> Self {
        let checker = Arc::new(checker);
        let (notifier, notices) = ChannelNotifier::new();
        let notifier = Arc::new(notifier);
        let session = FormValidationSession::builder(config)
            .checker(checker.clone())
            .notifier(notifier.clone())
            .build();
        Self {
            session,
            checker,
            notices,
            notifier,
        }
    }

    /// Drain every notice received so far.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            out.push(notice);
        }
        out
    }
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Long enough for every pending pass and check in these tests to finish.
pub async fn settle() {
    advance(10_000).await;
}
