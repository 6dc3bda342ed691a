use super::Field;

/// Outcome of one committed validation pass for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub field: Field,
    /// The value the pass was computed for.
    pub value: String,
    /// Error message, `None` when the value is valid.
    pub error: Option<String>,
}

impl ValidationResult {
    /// Check if the value passed.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Information about a single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Result of validating every field of a form at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationReport {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation, in form order.
    Invalid(Vec<FieldError>),
}

impl ValidationReport {
    /// Build a report from collected errors.
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation errors.
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first validation error (if any).
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Get the first invalid field, for focusing.
    pub fn first_invalid_field(&self) -> Option<Field> {
        self.first_error().map(|e| e.field)
    }
}
