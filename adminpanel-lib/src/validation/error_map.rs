use std::collections::HashMap;

use super::Field;

/// Current error message per field. A missing or empty entry means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: HashMap<Field, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current message for `field`; empty when valid.
    pub fn get(&self, field: Field) -> &str {
        self.entries.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Set or clear the message for `field`.
    ///
    /// Returns `true` if the visible message changed.
    pub fn set(&mut self, field: Field, error: Option<String>) -> bool {
        let next = error.unwrap_or_default();
        let changed = self.get(field) != next;
        if next.is_empty() {
            self.entries.remove(&field);
        } else {
            self.entries.insert(field, next);
        }
        changed
    }

    /// Clear the message for `field`.
    pub fn clear(&mut self, field: Field) -> bool {
        self.set(field, None)
    }

    /// Returns `true` if `field` has a non-empty message.
    pub fn has_error(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Returns `true` if no field has a message.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fields with a message.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut map = ErrorMap::new();
        assert_eq!(map.get(Field::Name), "");

        assert!(map.set(Field::Name, Some("Name is required.".into())));
        assert!(map.has_error(Field::Name));
        assert!(!map.set(Field::Name, Some("Name is required.".into())));

        assert!(map.clear(Field::Name));
        assert!(map.is_empty());
        assert!(!map.clear(Field::Name));
    }

    #[test]
    fn test_empty_message_counts_as_valid() {
        let mut map = ErrorMap::new();
        map.set(Field::Role, Some(String::new()));
        assert!(!map.has_error(Field::Role));
        assert!(map.is_empty());
    }
}
