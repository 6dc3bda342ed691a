//! Rule builder for a single field.

/// Type alias for sync validation rule closures.
type SyncRule = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Ordered synchronous rules for one field.
///
/// Rules run in the order they were added and stop at the first failure, so
/// a field reports at most one message.
///
/// # Example
///
/// ```
/// use adminpanel_lib::validation::FieldRules;
///
/// let rules = FieldRules::new()
///     .required("Name is required.")
///     .min_length(3, "Too short.");
///
/// assert_eq!(rules.check("").as_deref(), Some("Name is required."));
/// assert_eq!(rules.check("Al").as_deref(), Some("Too short."));
/// assert_eq!(rules.check("Ana"), None);
/// ```
#[derive(Default)]
pub struct FieldRules {
    rules: Vec<SyncRule>,
}

impl FieldRules {
    /// Create an empty rule list.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule. `f` returns `true` when the value is acceptable.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Require the field to be non-empty.
    ///
    /// Whitespace counts as content here; format rules reject it later.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require every character to satisfy `pred`.
    pub fn all_chars<P>(self, pred: P, msg: impl Into<String>) -> Self
    where
        P: Fn(char) -> bool + Send + Sync + 'static,
    {
        self.rule(move |v| v.chars().all(&pred), msg)
    }

    /// Require at least one character to satisfy `pred`.
    pub fn any_char<P>(self, pred: P, msg: impl Into<String>) -> Self
    where
        P: Fn(char) -> bool + Send + Sync + 'static,
    {
        self.rule(move |v| v.chars().any(&pred), msg)
    }

    /// Reject two or more consecutive whitespace characters.
    pub fn no_repeated_whitespace(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| {
                let mut prev_space = false;
                for c in v.chars() {
                    let space = c.is_whitespace();
                    if space && prev_space {
                        return false;
                    }
                    prev_space = space;
                }
                true
            },
            msg,
        )
    }

    /// Run the rules and return the first violated rule's message.
    pub fn check(&self, value: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule(value).err())
    }

    /// Number of rules in the list.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules were added.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("rules", &self.rules.len())
            .finish()
    }
}
