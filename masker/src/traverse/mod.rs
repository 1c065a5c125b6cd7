//! Traversal engine: walks a value and rebuilds a masked copy.
//!
//! Every maskable type reports a [`Shape`] that decides how annotations reach
//! it:
//!
//! | Shape | Types | Annotation handling |
//! |-------|-------|---------------------|
//! | `Leaf` | strings, numbers, `bool`, `char` | strategy applied |
//! | `Indirection` | `Option`, `Box`, `Rc`, `Arc` | forwarded to the pointee |
//! | `Record` | derived structs and enums | warning, members walked |
//! | `Sequence` | `Vec`, `VecDeque`, arrays, tuples | warning, elements walked |
//! | `Map` | `HashMap`, `BTreeMap` | warning, values walked |
//!
//! Unannotated leaves are copied. Composites are always walked so that nested
//! annotations and field rules are reached.
//!
//! A [`Walker`] carries the per-call state: the masker, the path of the
//! member being visited, and collected warnings.

use std::{any::Any, borrow::Cow, fmt, sync::Arc};

use crate::{
    annotation::Annotation,
    engine::Masker,
    error::{FieldPath, MaskError, MaskWarning, PathSegment, StrategyFailure},
    metadata::{AnnotationSource, MemberDescriptor, TypeMetadata},
    strategy::{Primitive, StrategyContext},
};

mod impls;
#[cfg(feature = "json")]
mod json;

/// How a value participates in traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Leaf,
    Record,
    Sequence,
    Map,
    Indirection,
}

impl Shape {
    /// Records, sequences and maps. Annotations never apply to these.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Record | Self::Sequence | Self::Map)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leaf => "leaf",
            Self::Record => "record",
            Self::Sequence => "sequence",
            Self::Map => "map",
            Self::Indirection => "indirection",
        })
    }
}

/// A type the masker can walk.
///
/// Derive it with `#[derive(Maskable)]` for structs and enums. Implementations
/// for strings, numbers, `bool`, `char`, and the std pointers and collections
/// are provided.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Maskable`",
    label = "this type cannot be masked",
    note = "use `#[derive(Maskable)]` on the type definition",
    note = "leaf types can implement `Leaf` and `Maskable` to accept strategies"
)]
pub trait Maskable: Sized + 'static {
    fn shape(&self) -> Shape;

    /// Shape of the value an annotation would land on.
    ///
    /// Indirections report their pointee; an absent value counts as a leaf.
    fn target_shape(&self) -> Shape {
        self.shape()
    }

    /// Member descriptors of a record type. Empty for everything else.
    fn members() -> Vec<MemberDescriptor> {
        Vec::new()
    }

    /// Returns a masked copy, walking nested members.
    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError>;

    /// Returns a masked copy of a value carrying `annotation`.
    ///
    /// The default reports an unsupported combination and walks the value as
    /// if it had no annotation. Leaves override this to apply the strategy.
    fn mask_annotated(
        &self,
        walker: &mut Walker<'_>,
        annotation: &Annotation,
    ) -> Result<Self, MaskError> {
        walker.unsupported(annotation, self.shape());
        self.mask_with(walker)
    }
}

/// A value that converts to and from a [`Primitive`] for strategies.
pub trait Leaf: Sized {
    fn to_primitive(&self) -> Primitive;

    /// Rebuilds the value from a masked primitive.
    ///
    /// Fails when the primitive has another runtime type or does not fit.
    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure>;
}

/// Result of [`Masker::mask_with_report`].
#[derive(Clone, Debug, PartialEq)]
pub struct Masked<T> {
    pub value: T,
    pub warnings: Vec<MaskWarning>,
}

impl<T> Masked<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Per-call traversal state.
#[derive(Debug)]
pub struct Walker<'m> {
    masker: &'m Masker,
    path: FieldPath,
    warnings: Vec<MaskWarning>,
}

impl<'m> Walker<'m> {
    pub(crate) fn new(masker: &'m Masker) -> Self {
        Self {
            masker,
            path: FieldPath::root(),
            warnings: Vec::new(),
        }
    }

    /// Location of the value currently being visited.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Resolved member metadata for `T`, from the masker's cache.
    pub fn metadata<T: Maskable>(&self) -> Arc<TypeMetadata> {
        self.masker.type_metadata::<T>()
    }

    /// Masks member `index` of a record described by `metadata`.
    ///
    /// Explicit annotations are always passed on. Field rules only reach
    /// leaves, including leaves behind indirections.
    pub fn member<T: Maskable>(
        &mut self,
        metadata: &TypeMetadata,
        index: usize,
        value: &T,
    ) -> Result<T, MaskError> {
        let Some(member) = metadata.member(index) else {
            return self.scoped(PathSegment::Index(index), |walker| value.mask_with(walker));
        };
        let annotation = member.annotation().filter(|_| {
            member.source() == Some(AnnotationSource::Explicit)
                || !value.target_shape().is_composite()
        });
        self.scoped(PathSegment::Field(member.name()), |walker| match annotation {
            Some(annotation) => value.mask_annotated(walker, annotation),
            None => value.mask_with(walker),
        })
    }

    /// Masks one sequence element.
    pub fn element<T: Maskable>(&mut self, index: usize, value: &T) -> Result<T, MaskError> {
        self.scoped(PathSegment::Index(index), |walker| value.mask_with(walker))
    }

    /// Masks one map value. The key is never masked.
    ///
    /// String keys (`String`, `&'static str`, `Cow<'static, str>`) are
    /// matched against field rules; a matching rule is applied when the
    /// value is a leaf, directly or behind an indirection.
    pub fn entry<K: 'static, V: Maskable>(
        &mut self,
        ordinal: usize,
        key: &K,
        value: &V,
    ) -> Result<V, MaskError> {
        let masker = self.masker;
        let name = string_key(key);
        let rule = name
            .and_then(|name| masker.fields.resolve(name))
            .and_then(|text| masker.cache.annotation(text))
            .filter(|_| !value.target_shape().is_composite());
        let segment = name.map_or(PathSegment::Entry(ordinal), |name| {
            PathSegment::Key(name.to_string())
        });
        self.scoped(segment, |walker| match &rule {
            Some(annotation) => value.mask_annotated(walker, annotation),
            None => value.mask_with(walker),
        })
    }

    /// Applies `annotation` to a leaf and converts the result back.
    pub fn mask_leaf<L: Leaf>(&self, annotation: &Annotation, value: &L) -> Result<L, MaskError> {
        let masked = self.apply(annotation, value.to_primitive())?;
        L::from_primitive(masked).map_err(|failure| self.fail(annotation, failure))
    }

    /// Runs the strategy named by `annotation` on one primitive.
    pub fn apply(&self, annotation: &Annotation, value: Primitive) -> Result<Primitive, MaskError> {
        let ctx = StrategyContext::new(annotation.argument(), self.masker.mask_char());
        self.masker
            .strategies
            .apply(annotation.strategy(), &ctx, value)
            .map_err(|error| error.at(&self.path))
    }

    /// Builds the error for a failure at the current path.
    pub fn fail(&self, annotation: &Annotation, failure: StrategyFailure) -> MaskError {
        MaskError::from_failure(self.path.clone(), annotation, failure)
    }

    /// Records that `annotation` was found on a value of `shape` and ignored.
    pub fn unsupported(&mut self, annotation: &Annotation, shape: Shape) {
        tracing::warn!(
            path = %self.path,
            strategy = annotation.strategy(),
            %shape,
            "mask annotation ignored on composite member"
        );
        self.warnings.push(MaskWarning::UnsupportedCombination {
            path: self.path.clone(),
            strategy: annotation.strategy().to_string(),
            shape,
        });
    }

    pub(crate) fn into_warnings(self) -> Vec<MaskWarning> {
        self.warnings
    }

    fn scoped<T>(
        &mut self,
        segment: PathSegment,
        visit: impl FnOnce(&mut Self) -> Result<T, MaskError>,
    ) -> Result<T, MaskError> {
        self.path.push(segment);
        let result = visit(self);
        self.path.pop();
        result
    }
}

fn string_key<K: 'static>(key: &K) -> Option<&str> {
    let key: &dyn Any = key;
    if let Some(key) = key.downcast_ref::<String>() {
        return Some(key.as_str());
    }
    if let Some(key) = key.downcast_ref::<&'static str>() {
        return Some(*key);
    }
    key.downcast_ref::<Cow<'static, str>>().map(AsRef::as_ref)
}
