//! Field validation for the panel forms.
//!
//! Synchronous rules live in [`RuleSet`]; each form gets its own set through
//! [`FormKind::rule_set`]. Rules short-circuit: the first violated rule is the
//! only message reported for a field.
//!
//! # Example
//!
//! ```
//! use adminpanel_lib::validation::{Field, FormKind, RuleContext};
//!
//! let rules = FormKind::SignIn.rule_set();
//! let ctx = RuleContext::default();
//!
//! assert_eq!(rules.check(Field::Name, "", ctx).as_deref(), Some("Name is required."));
//! assert_eq!(rules.check(Field::Name, "Ana Gomez", ctx), None);
//! ```

mod error_map;
mod field;
mod result;
mod rule_set;
mod rules;

pub use error_map::ErrorMap;
pub use field::{Field, FieldSpec, FieldStatus, FormKind, Phase, ValidationMode};
pub use result::{FieldError, ValidationReport, ValidationResult};
pub use rule_set::{RuleContext, RuleSet, SPECIAL_CHARACTERS};
pub use rules::FieldRules;
