//! Per-form rule sets.

use std::collections::HashMap;

use super::{Field, FieldRules};

/// Characters accepted by the "special character" password rule.
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+={}[]:;'"<>,.?/\|-"#;

/// Mode flags passed to every rule evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Editing an existing record rather than creating one.
    pub edit_mode: bool,
}

impl RuleContext {
    /// Context for editing an existing record.
    pub fn editing() -> Self {
        Self { edit_mode: true }
    }
}

struct Entry {
    rules: FieldRules,
    skip_in_edit_mode: bool,
}

/// Synchronous rules for every field of one form.
#[derive(Default)]
pub struct RuleSet {
    entries: HashMap<Field, Entry>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rules for `field`.
    pub fn field(mut self, field: Field, rules: FieldRules) -> Self {
        self.entries.insert(
            field,
            Entry {
                rules,
                skip_in_edit_mode: false,
            },
        );
        self
    }

    /// Register rules for `field` that do not apply while editing.
    pub fn create_only(mut self, field: Field, rules: FieldRules) -> Self {
        self.entries.insert(
            field,
            Entry {
                rules,
                skip_in_edit_mode: true,
            },
        );
        self
    }

    /// Rules of the sign-in screen.
    pub fn sign_in() -> Self {
        let name = FieldRules::new()
            .required("Name is required.")
            .min_length(3, "Name must be between 3 and 50 characters.")
            .max_length(50, "Name must be between 3 and 50 characters.")
            .all_chars(
                |c| c.is_alphabetic() || c.is_whitespace(),
                "Name may only contain letters and spaces.",
            )
            .no_repeated_whitespace("Name cannot contain multiple consecutive spaces.");

        let password = FieldRules::new()
            .required("Password is required.")
            .min_length(4, "Password must be at least 4 characters.");

        Self::new()
            .field(Field::Name, name)
            .field(Field::Password, password)
    }

    /// Rules of the user create/edit dialog.
    ///
    /// Name lengths differ from the sign-in screen.
    pub fn user_form() -> Self {
        let name = FieldRules::new()
            .required("Name is required.")
            .min_length(5, "Name must contain at least 5 letters.")
            .max_length(30, "Name must not exceed 30 characters.")
            .all_chars(
                |c| c.is_alphabetic() || c.is_whitespace(),
                "Name must not include special characters or numbers.",
            )
            .no_repeated_whitespace("Name cannot contain multiple consecutive spaces.");

        let password = FieldRules::new()
            .required("Password is required.")
            .min_length(8, "Password must be at least 8 characters.")
            .max_length(20, "Password must not exceed 20 characters.")
            .any_char(
                |c| c.is_ascii_alphabetic(),
                "Password must contain at least one letter (a-z, A-Z).",
            )
            .any_char(
                |c| c.is_ascii_digit(),
                "Password must contain at least one number (0-9).",
            )
            .any_char(
                |c| SPECIAL_CHARACTERS.contains(c),
                format!("Password must contain at least one special character: {SPECIAL_CHARACTERS}"),
            );

        let role = FieldRules::new().required("A role must be selected.");

        Self::new()
            .field(Field::Name, name)
            .create_only(Field::Password, password)
            .field(Field::Role, role)
    }

    /// Validate `value` for `field`. Fields without rules always pass.
    pub fn check(&self, field: Field, value: &str, ctx: RuleContext) -> Option<String> {
        let entry = self.entries.get(&field)?;
        if entry.skip_in_edit_mode && ctx.edit_mode {
            return None;
        }
        entry.rules.check(value)
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.entries.keys().collect();
        fields.sort();
        f.debug_struct("RuleSet").field("fields", &fields).finish()
    }
}
