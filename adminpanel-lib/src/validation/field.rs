//! Form fields and their validation modes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::RuleSet;

/// A field of one of the panel forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Password,
    Role,
}

impl Field {
    /// Identifier used by the view layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Password => "password",
            Self::Role => "role",
        }
    }

    /// Key of this field in backend records.
    pub fn remote_key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Password => "password",
            Self::Role => "id_rol",
        }
    }

    /// Human-readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Password => "Password",
            Self::Role => "Role",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" | "nombre" => Ok(Self::Name),
            "password" => Ok(Self::Password),
            "role" | "id_rol" => Ok(Self::Role),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// How a field is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Synchronous rules only.
    SyncOnly,
    /// Synchronous rules, then a remote uniqueness check for non-empty values.
    SyncAndRemoteUnique,
}

/// A field as declared by a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub mode: ValidationMode,
    /// Whether an error on this field blocks submission.
    pub required: bool,
}

impl FieldSpec {
    const fn sync(field: Field) -> Self {
        Self {
            field,
            mode: ValidationMode::SyncOnly,
            required: true,
        }
    }

    const fn unique(field: Field) -> Self {
        Self {
            field,
            mode: ValidationMode::SyncAndRemoteUnique,
            required: true,
        }
    }

    /// Returns `true` if this field is checked remotely.
    pub fn is_remote(&self) -> bool {
        self.mode == ValidationMode::SyncAndRemoteUnique
    }
}

const SIGN_IN_FIELDS: &[FieldSpec] = &[FieldSpec::sync(Field::Name), FieldSpec::sync(Field::Password)];

const USER_FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::unique(Field::Name),
    FieldSpec::sync(Field::Password),
    FieldSpec::sync(Field::Role),
];

/// The two forms of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Sign-in screen: name and password, synchronous checks only.
    SignIn,
    /// User create/edit dialog: unique name, password and role.
    UserForm,
}

impl FormKind {
    /// Fields of this form, in display order.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::SignIn => SIGN_IN_FIELDS,
            Self::UserForm => USER_FORM_FIELDS,
        }
    }

    /// Looks up the declaration of `field` in this form.
    pub fn spec(self, field: Field) -> Option<FieldSpec> {
        self.fields().iter().copied().find(|s| s.field == field)
    }

    /// Default debounce quiet period.
    pub fn default_quiet_period(self) -> Duration {
        match self {
            Self::SignIn => Duration::from_millis(300),
            Self::UserForm => Duration::from_millis(400),
        }
    }

    /// Synchronous rules for this form.
    pub fn rule_set(self) -> RuleSet {
        match self {
            Self::SignIn => RuleSet::sign_in(),
            Self::UserForm => RuleSet::user_form(),
        }
    }
}

/// Which part of a validation pass is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sync,
    Remote,
}

/// Per-field validation state.
///
/// Any edit moves a field back to `Validating(Phase::Sync)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldStatus {
    #[default]
    Untouched,
    Validating(Phase),
    Valid,
    Invalid,
}

impl FieldStatus {
    /// Returns `true` while a debounced pass or remote check is outstanding.
    pub fn is_validating(&self) -> bool {
        matches!(self, Self::Validating(_))
    }
}
