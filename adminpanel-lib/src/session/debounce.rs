//! Per-field debounce tokens.

use std::collections::HashMap;
use std::time::Duration;

use crate::validation::Field;

/// Identifies one scheduled validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken {
    pub field: Field,
    generation: u64,
}

/// Latest-wins debounce bookkeeping.
///
/// Scheduling a pass for a field replaces the field's pending token. When the
/// quiet period elapses the pass checks [`Debouncer::is_current`] and quits if
/// a newer edit arrived meanwhile. Fields do not delay each other.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: HashMap<Field, u64>,
    next_generation: u64,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: HashMap::new(),
            next_generation: 0,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Schedule a pass for `field`, superseding any pending one.
    pub fn schedule(&mut self, field: Field) -> DebounceToken {
        self.next_generation += 1;
        self.pending.insert(field, self.next_generation);
        DebounceToken {
            field,
            generation: self.next_generation,
        }
    }

    /// Returns `true` if no newer pass was scheduled for the token's field.
    pub fn is_current(&self, token: DebounceToken) -> bool {
        self.pending.get(&token.field) == Some(&token.generation)
    }

    /// Invalidate the outstanding token for `field`.
    pub fn supersede(&mut self, field: Field) {
        self.pending.remove(&field);
    }

    /// Invalidate every outstanding token.
    pub fn supersede_all(&mut self) {
        self.pending.clear();
    }
}
