//! The `Masker` handle and the process-wide default instance.
//!
//! A `Masker` bundles a strategy registry, field rules, the metadata cache and
//! the masking settings. Configuration takes `&mut self`; masking takes
//! `&self`, so a configured masker can be shared across threads (for example
//! behind an `Arc` or in a `static`).

use std::{
    any::{type_name, TypeId},
    sync::Arc,
};

use once_cell::sync::OnceCell;

use crate::{
    config::MaskerConfig,
    error::{FieldPath, MaskError},
    metadata::{MetadataCache, TypeMetadata},
    rules::FieldRules,
    strategy::{Primitive, StrategyContext, StrategyFn, StrategyRegistry},
    traverse::{Leaf, Maskable, Masked, Walker},
    StrategyFailure,
};

/// Attribute key honoured unless changed with [`Masker::set_annotation_key`].
pub const DEFAULT_ANNOTATION_KEY: &str = "mask";

/// Character used by the built-in strategies unless changed.
pub const DEFAULT_MASK_CHAR: char = '*';

static DEFAULT: OnceCell<Masker> = OnceCell::new();

/// Masking engine instance.
#[derive(Debug)]
pub struct Masker {
    pub(crate) strategies: StrategyRegistry,
    pub(crate) fields: FieldRules,
    pub(crate) cache: MetadataCache,
    annotation_key: String,
    mask_char: char,
}

impl Default for Masker {
    fn default() -> Self {
        Self::new()
    }
}

impl Masker {
    /// A masker with the built-in strategies and no field rules.
    pub fn new() -> Self {
        Self {
            strategies: StrategyRegistry::with_builtins(),
            fields: FieldRules::new(),
            cache: MetadataCache::new(),
            annotation_key: DEFAULT_ANNOTATION_KEY.to_string(),
            mask_char: DEFAULT_MASK_CHAR,
        }
    }

    /// A masker with the built-in strategies and the default field rules.
    pub fn with_default_rules() -> Self {
        Self {
            fields: FieldRules::with_defaults(),
            ..Self::new()
        }
    }

    pub fn from_config(config: &MaskerConfig) -> Self {
        let mut masker = Self::new();
        masker.set_annotation_key(config.annotation_key.clone());
        masker.set_mask_char(config.mask_char);
        masker.set_cache_enabled(config.cache_enabled);
        for (name, annotation) in &config.fields {
            masker.register_field(name.clone(), annotation.clone());
        }
        masker
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Selects which attribute key's annotations are honoured.
    pub fn set_annotation_key(&mut self, key: impl Into<String>) {
        self.annotation_key = key.into();
        self.cache.clear();
    }

    pub fn annotation_key(&self) -> &str {
        &self.annotation_key
    }

    pub fn set_mask_char(&mut self, mask_char: char) {
        self.mask_char = mask_char;
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    /// Sets the default annotation for members and map keys named `name`.
    pub fn register_field(&mut self, name: impl Into<String>, annotation: impl Into<String>) {
        self.fields.register(name, annotation);
        self.cache.clear();
    }

    pub fn fields(&self) -> &FieldRules {
        &self.fields
    }

    /// Registers a strategy under its category and `name`, replacing any
    /// earlier registration.
    pub fn register_strategy(&mut self, name: impl Into<String>, strategy: StrategyFn) {
        self.strategies.register(name, strategy);
    }

    pub fn register_string<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&StrategyContext<'_>, &str) -> Result<String, StrategyFailure> + Send + Sync + 'static,
    {
        self.register_strategy(name, StrategyFn::string(function));
    }

    pub fn register_int<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&StrategyContext<'_>, i64) -> Result<i64, StrategyFailure> + Send + Sync + 'static,
    {
        self.register_strategy(name, StrategyFn::int(function));
    }

    pub fn register_uint<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&StrategyContext<'_>, u64) -> Result<u64, StrategyFailure> + Send + Sync + 'static,
    {
        self.register_strategy(name, StrategyFn::uint(function));
    }

    pub fn register_float<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&StrategyContext<'_>, f64) -> Result<f64, StrategyFailure> + Send + Sync + 'static,
    {
        self.register_strategy(name, StrategyFn::float(function));
    }

    pub fn register_any<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&StrategyContext<'_>, Primitive) -> Result<Primitive, StrategyFailure>
            + Send
            + Sync
            + 'static,
    {
        self.register_strategy(name, StrategyFn::any(function));
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// Enables or disables the metadata cache. Disabling discards its entries.
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache.set_enabled(enabled);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    // =========================================================================
    // Masking
    // =========================================================================

    /// Returns a masked copy of `value`. The input is not modified.
    ///
    /// Any strategy error aborts the whole call.
    pub fn mask<T: Maskable>(&self, value: &T) -> Result<T, MaskError> {
        self.mask_with_report(value).map(Masked::into_value)
    }

    /// Like [`Masker::mask`], also returning the non-fatal warnings.
    pub fn mask_with_report<T: Maskable>(&self, value: &T) -> Result<Masked<T>, MaskError> {
        let mut walker = Walker::new(self);
        let value = value.mask_with(&mut walker)?;
        Ok(Masked {
            value,
            warnings: walker.into_warnings(),
        })
    }

    /// Resolved member metadata for `T`, built on first use.
    pub fn type_metadata<T: Maskable>(&self) -> Arc<TypeMetadata> {
        self.cache.get_or_build(TypeId::of::<T>(), || {
            TypeMetadata::resolve(
                type_name::<T>(),
                &T::members(),
                &self.annotation_key,
                &self.fields,
                &self.cache,
            )
        })
    }

    // =========================================================================
    // Direct helpers
    // =========================================================================

    /// Masks one string with annotation text such as `"preserveEnds(2,2)"`.
    pub fn string(&self, annotation: &str, value: &str) -> Result<String, MaskError> {
        self.apply_direct(annotation, &value.to_string())
    }

    pub fn int(&self, annotation: &str, value: i64) -> Result<i64, MaskError> {
        self.apply_direct(annotation, &value)
    }

    pub fn uint(&self, annotation: &str, value: u64) -> Result<u64, MaskError> {
        self.apply_direct(annotation, &value)
    }

    pub fn float(&self, annotation: &str, value: f64) -> Result<f64, MaskError> {
        self.apply_direct(annotation, &value)
    }

    fn apply_direct<L: Leaf>(&self, annotation: &str, value: &L) -> Result<L, MaskError> {
        let Some(annotation) = self.cache.annotation(annotation) else {
            return Err(MaskError::UnknownStrategy {
                path: FieldPath::root(),
                category: value.to_primitive().category(),
                strategy: String::new(),
            });
        };
        Walker::new(self).mask_leaf(&annotation, value)
    }
}

// =============================================================================
// Default instance
// =============================================================================

/// The process-wide masker, created with the default field rules on first use.
pub fn default_masker() -> &'static Masker {
    DEFAULT.get_or_init(Masker::with_default_rules)
}

/// Installs `masker` as the default instance.
///
/// Fails, returning `masker`, once the default has been used or set.
pub fn set_default(masker: Masker) -> Result<(), Masker> {
    DEFAULT.set(masker)
}

/// Masks `value` with the default instance.
pub fn mask<T: Maskable>(value: &T) -> Result<T, MaskError> {
    default_masker().mask(value)
}
