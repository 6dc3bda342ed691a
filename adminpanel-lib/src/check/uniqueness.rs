//! Uniqueness checks against the remote record collection.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, CheckerError};

/// Source of the full record collection.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record as raw JSON objects.
    async fn fetch_all_records(&self) -> Result<Vec<Value>, ApiError>;
}

/// Answers whether a value is already taken.
#[async_trait]
pub trait UniquenessChecker: Send + Sync {
    /// Returns `true` if a record already has `value` in `field`.
    ///
    /// `field` is the record key (for example `nombre`).
    async fn check_exists(&self, field: &str, value: &str) -> Result<bool, CheckerError>;
}

/// Checker that scans the whole collection for an exact match.
///
/// There is no server-side filter endpoint, so every check downloads the
/// collection. Matching is exact: case and surrounding whitespace matter.
pub struct RemoteUniquenessChecker<S> {
    source: S,
}

impl<S: RecordSource> RemoteUniquenessChecker<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: RecordSource> UniquenessChecker for RemoteUniquenessChecker<S> {
    async fn check_exists(&self, field: &str, value: &str) -> Result<bool, CheckerError> {
        let records = self.source.fetch_all_records().await?;
        let exists = records
            .iter()
            .any(|record| record.get(field).and_then(Value::as_str) == Some(value));
        log::trace!(
            "[unique] {field}={value:?} exists={exists} ({} records)",
            records.len()
        );
        Ok(exists)
    }
}
