//! Latest-value race guard for asynchronous checks.

use std::collections::HashMap;

use crate::validation::Field;

/// Whether a completed check may touch visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The check matches the field's latest requested and live value.
    Commit,
    /// The field moved on; drop the result.
    Stale,
}

/// Committed outcome of a remote check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No record has the value.
    Unique,
    /// A record already has the value.
    Taken,
    /// The check failed; the field is let through unconfirmed.
    Unverified,
}

/// Single-slot "expected value" register per field.
///
/// Each new request overwrites the slot. A completion is only committed if
/// its value equals both the slot and the live form value, whatever order
/// the checks finish in. In-flight checks are never aborted.
#[derive(Debug, Default)]
pub struct RaceResolver {
    requested: HashMap<Field, String>,
    verdicts: HashMap<Field, (String, Verdict)>,
}

impl RaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` as the latest requested value for `field`.
    pub fn request(&mut self, field: Field, value: impl Into<String>) {
        self.requested.insert(field, value.into());
    }

    /// Latest requested value for `field`.
    pub fn requested(&self, field: Field) -> Option<&str> {
        self.requested.get(&field).map(String::as_str)
    }

    /// Decide whether a check for `value` that just finished may be applied.
    pub fn resolve(&self, field: Field, value: &str, live: &str) -> Resolution {
        if self.requested(field) == Some(value) && live == value {
            Resolution::Commit
        } else {
            Resolution::Stale
        }
    }

    /// Store the committed verdict for `value`.
    pub fn commit(&mut self, field: Field, value: impl Into<String>, verdict: Verdict) {
        self.verdicts.insert(field, (value.into(), verdict));
    }

    /// Committed verdict for `field`, if it was computed for `value`.
    pub fn verdict_for(&self, field: Field, value: &str) -> Option<Verdict> {
        self.verdicts
            .get(&field)
            .filter(|(v, _)| v == value)
            .map(|(_, verdict)| *verdict)
    }

    /// Returns `true` if a check for `value` is outstanding.
    pub fn is_pending(&self, field: Field, value: &str) -> bool {
        self.requested(field) == Some(value) && self.verdict_for(field, value).is_none()
    }

    /// Forget everything; outstanding checks become stale.
    pub fn reset(&mut self) {
        self.requested.clear();
        self.verdicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_wins_regardless_of_completion_order() {
        let mut resolver = RaceResolver::new();
        resolver.request(Field::Name, "Ana");
        resolver.request(Field::Name, "Anabel");

        // "Anabel" finishes first and is committed.
        assert_eq!(resolver.resolve(Field::Name, "Anabel", "Anabel"), Resolution::Commit);
        resolver.commit(Field::Name, "Anabel", Verdict::Unique);

        // The slow "Ana" check arrives later and is dropped.
        assert_eq!(resolver.resolve(Field::Name, "Ana", "Anabel"), Resolution::Stale);
        assert_eq!(resolver.verdict_for(Field::Name, "Anabel"), Some(Verdict::Unique));
        assert_eq!(resolver.verdict_for(Field::Name, "Ana"), None);
    }

    #[test]
    fn test_live_value_mismatch_is_stale() {
        let mut resolver = RaceResolver::new();
        resolver.request(Field::Name, "Anabel");
        // The user kept typing but no new check was issued yet.
        assert_eq!(resolver.resolve(Field::Name, "Anabel", "Anabell"), Resolution::Stale);
    }

    #[test]
    fn test_fields_are_independent() {
        let mut resolver = RaceResolver::new();
        resolver.request(Field::Name, "Ana");
        resolver.request(Field::Role, "2");
        assert_eq!(resolver.resolve(Field::Name, "Ana", "Ana"), Resolution::Commit);
        assert_eq!(resolver.resolve(Field::Role, "2", "2"), Resolution::Commit);
    }

    #[test]
    fn test_pending_and_reset() {
        let mut resolver = RaceResolver::new();
        resolver.request(Field::Name, "Ana Gomez");
        assert!(resolver.is_pending(Field::Name, "Ana Gomez"));

        resolver.commit(Field::Name, "Ana Gomez", Verdict::Taken);
        assert!(!resolver.is_pending(Field::Name, "Ana Gomez"));

        resolver.reset();
        assert_eq!(resolver.requested(Field::Name), None);
        assert_eq!(resolver.resolve(Field::Name, "Ana Gomez", "Ana Gomez"), Resolution::Stale);
    }
}
