//! Per-type member metadata and the cache that holds it.
//!
//! `#[derive(Maskable)]` describes each member with a [`MemberDescriptor`]:
//! its name and the raw annotation texts found on it, keyed by attribute key.
//! The first time a type is masked, the descriptors are resolved against the
//! masker's annotation key and field rules into a [`TypeMetadata`], which is
//! cached by `TypeId` for later calls.
//!
//! ## Resolution order
//!
//! | Member has | Result |
//! |------------|--------|
//! | annotation under the configured key | that annotation ([`AnnotationSource::Explicit`]) |
//! | field rule for its name | the rule ([`AnnotationSource::FieldRule`]) |
//! | neither | no annotation |

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;

use crate::{annotation::Annotation, rules::FieldRules};

/// Compile-time description of one member of a derived type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberDescriptor {
    name: &'static str,
    annotations: &'static [(&'static str, &'static str)],
}

impl MemberDescriptor {
    /// `annotations` pairs an attribute key with its annotation text.
    pub const fn new(
        name: &'static str,
        annotations: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { name, annotations }
    }

    /// Declared member name. Tuple members are named by position (`"0"`, `"1"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Annotation text stored under `key`, if any.
    pub fn annotation(&self, key: &str) -> Option<&'static str> {
        self.annotations
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, text)| *text)
    }
}

/// Where a member's resolved annotation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationSource {
    /// Written on the member under the configured annotation key.
    Explicit,
    /// Registered as a field rule for the member's name.
    FieldRule,
}

/// One member with its resolved annotation.
#[derive(Clone, Debug)]
pub struct MemberMetadata {
    name: &'static str,
    resolved: Option<(Arc<Annotation>, AnnotationSource)>,
}

impl MemberMetadata {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.resolved.as_ref().map(|(annotation, _)| annotation.as_ref())
    }

    pub fn source(&self) -> Option<AnnotationSource> {
        self.resolved.as_ref().map(|(_, source)| *source)
    }
}

/// Resolved members of one concrete type, in declaration order.
#[derive(Clone, Debug)]
pub struct TypeMetadata {
    type_name: &'static str,
    members: Vec<MemberMetadata>,
}

impl TypeMetadata {
    /// Resolves `descriptors` against the annotation key and field rules.
    ///
    /// Blank annotation texts count as absent.
    pub fn resolve(
        type_name: &'static str,
        descriptors: &[MemberDescriptor],
        annotation_key: &str,
        rules: &FieldRules,
        cache: &MetadataCache,
    ) -> Self {
        let members = descriptors
            .iter()
            .map(|descriptor| {
                let explicit = descriptor
                    .annotation(annotation_key)
                    .and_then(|text| cache.annotation(text))
                    .map(|annotation| (annotation, AnnotationSource::Explicit));
                let resolved = explicit.or_else(|| {
                    rules
                        .resolve(descriptor.name())
                        .and_then(|text| cache.annotation(text))
                        .map(|annotation| (annotation, AnnotationSource::FieldRule))
                });
                MemberMetadata {
                    name: descriptor.name(),
                    resolved,
                }
            })
            .collect();
        Self { type_name, members }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn members(&self) -> &[MemberMetadata] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&MemberMetadata> {
        self.members.get(index)
    }
}

/// Thread-safe cache of [`TypeMetadata`] by `TypeId` and of parsed
/// annotation texts.
///
/// Concurrent first encounters of a type may each build its metadata; the
/// first insert is kept and returned to every caller.
#[derive(Debug)]
pub struct MetadataCache {
    enabled: AtomicBool,
    types: RwLock<HashMap<TypeId, Arc<TypeMetadata>>>,
    annotations: RwLock<HashMap<String, Arc<Annotation>>>,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    /// An empty, enabled cache.
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            types: RwLock::new(HashMap::new()),
            annotations: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached metadata for `type_id`, building and storing it on
    /// a miss. While disabled, always builds and never stores.
    pub fn get_or_build<F>(&self, type_id: TypeId, build: F) -> Arc<TypeMetadata>
    where
        F: FnOnce() -> TypeMetadata,
    {
        if !self.is_enabled() {
            return Arc::new(build());
        }
        if let Some(metadata) = self.types.read().get(&type_id) {
            return Arc::clone(metadata);
        }

        let built = Arc::new(build());
        let mut types = self.types.write();
        if !self.is_enabled() {
            return built;
        }
        let stored = types.entry(type_id).or_insert_with(|| {
            tracing::debug!(
                type_name = built.type_name(),
                members = built.members().len(),
                "built type metadata"
            );
            Arc::clone(&built)
        });
        Arc::clone(stored)
    }

    /// Parses annotation text, memoized while enabled. `None` for blank text.
    pub fn annotation(&self, text: &str) -> Option<Arc<Annotation>> {
        if !self.is_enabled() {
            return Annotation::parse(text).map(Arc::new);
        }
        if let Some(annotation) = self.annotations.read().get(text) {
            return Some(Arc::clone(annotation));
        }

        let parsed = Arc::new(Annotation::parse(text)?);
        let mut annotations = self.annotations.write();
        if !self.is_enabled() {
            return Some(parsed);
        }
        let stored = annotations
            .entry(text.to_string())
            .or_insert_with(|| Arc::clone(&parsed));
        Some(Arc::clone(stored))
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.types.write().clear();
        self.annotations.write().clear();
    }

    /// Enables or disables caching. Disabling discards existing entries.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
