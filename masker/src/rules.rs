//! Field rules: default annotations chosen by member or map key name.
//!
//! A rule applies when a struct member or string map key has exactly the
//! registered name (case-sensitive) and carries no explicit annotation.

use std::collections::HashMap;

/// The rules installed on the default masker.
pub const DEFAULT_FIELD_RULES: &[(&str, &str)] = &[
    ("Password", "filled4"),
    ("password", "filled4"),
    ("SigningKey", "filled32"),
    ("signing_key", "filled32"),
    ("Authorization", "filled32"),
    ("authorization", "filled32"),
];

/// Name to annotation text table.
#[derive(Clone, Debug, Default)]
pub struct FieldRules {
    rules: HashMap<String, String>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding [`DEFAULT_FIELD_RULES`].
    pub fn with_defaults() -> Self {
        let mut rules = Self::new();
        for (name, annotation) in DEFAULT_FIELD_RULES {
            rules.register(*name, *annotation);
        }
        rules
    }

    /// Sets the annotation text for `name`. The last registration wins.
    pub fn register(&mut self, name: impl Into<String>, annotation: impl Into<String>) {
        let name = name.into();
        let annotation = annotation.into();
        if let Some(previous) = self.rules.insert(name.clone(), annotation) {
            tracing::trace!(field = %name, %previous, "replaced field rule");
        }
    }

    /// Annotation text registered for exactly `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|(name, annotation)| (name.as_str(), annotation.as_str()))
    }
}
