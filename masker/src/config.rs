//! Declarative masker settings.
//!
//! With the `serde` feature, [`MaskerConfig`] can be loaded from the host
//! application's own configuration file:
//!
//! ```toml
//! annotation_key = "log"
//! mask_char = "#"
//! cache_enabled = true
//!
//! [fields]
//! api_key = "fixed"
//! email = "preserveEnds(2,4)"
//! ```

use std::collections::BTreeMap;

use crate::{
    engine::{DEFAULT_ANNOTATION_KEY, DEFAULT_MASK_CHAR},
    rules::DEFAULT_FIELD_RULES,
};

/// Settings used by `Masker::from_config`.
///
/// Strategies are code and are registered on the built masker instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default, deny_unknown_fields)
)]
pub struct MaskerConfig {
    /// Attribute key whose annotations are honoured.
    pub annotation_key: String,
    /// Character used by the built-in strategies.
    pub mask_char: char,
    /// Whether type metadata and parsed annotations are cached.
    pub cache_enabled: bool,
    /// Field rules, by exact member or map key name.
    pub fields: BTreeMap<String, String>,
}

impl Default for MaskerConfig {
    fn default() -> Self {
        Self {
            annotation_key: DEFAULT_ANNOTATION_KEY.to_string(),
            mask_char: DEFAULT_MASK_CHAR,
            cache_enabled: true,
            fields: BTreeMap::new(),
        }
    }
}

impl MaskerConfig {
    /// Adds the default field rules, keeping rules already present.
    #[must_use]
    pub fn with_default_rules(mut self) -> Self {
        for (name, annotation) in DEFAULT_FIELD_RULES {
            self.fields
                .entry((*name).to_string())
                .or_insert_with(|| (*annotation).to_string());
        }
        self
    }

    #[must_use]
    pub fn with_annotation_key(mut self, key: impl Into<String>) -> Self {
        self.annotation_key = key.into();
        self
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, annotation: impl Into<String>) -> Self {
        self.fields.insert(name.into(), annotation.into());
        self
    }
}
