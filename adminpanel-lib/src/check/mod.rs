//! Remote uniqueness checks and the latest-value race guard.

mod race;
mod uniqueness;

pub use race::{RaceResolver, Resolution, Verdict};
pub use uniqueness::{RecordSource, RemoteUniquenessChecker, UniquenessChecker};
