//! `Maskable` and `Leaf` implementations for standard library types.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap, VecDeque},
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    rc::Rc,
    sync::Arc,
};

use super::{Leaf, Maskable, Shape, Walker};
use crate::{annotation::Annotation, error::MaskError, strategy::Primitive, StrategyFailure};

fn mismatch(expected: &str, found: &Primitive) -> StrategyFailure {
    StrategyFailure::custom(format!(
        "expected a {expected} value, strategy returned a {} value",
        found.kind()
    ))
}

fn out_of_range(value: impl std::fmt::Display, target: &str) -> StrategyFailure {
    StrategyFailure::custom(format!("masked value {value} does not fit in {target}"))
}

// =============================================================================
// Leaf conversions
// =============================================================================

macro_rules! impl_leaf_signed {
    ($($ty:ty),*) => {
        $(
            impl Leaf for $ty {
                #[allow(trivial_numeric_casts, clippy::cast_lossless, clippy::cast_possible_wrap)]
                fn to_primitive(&self) -> Primitive {
                    Primitive::Int(*self as i64)
                }

                fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
                    match value {
                        Primitive::Int(number) => {
                            <$ty>::try_from(number).map_err(|_| out_of_range(number, stringify!($ty)))
                        }
                        other => Err(mismatch("signed integer", &other)),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_leaf_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Leaf for $ty {
                #[allow(trivial_numeric_casts, clippy::cast_lossless)]
                fn to_primitive(&self) -> Primitive {
                    Primitive::Uint(*self as u64)
                }

                fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
                    match value {
                        Primitive::Uint(number) => {
                            <$ty>::try_from(number).map_err(|_| out_of_range(number, stringify!($ty)))
                        }
                        other => Err(mismatch("unsigned integer", &other)),
                    }
                }
            }
        )*
    };
}

impl_leaf_signed!(i8, i16, i32, i64, isize);
impl_leaf_unsigned!(u8, u16, u32, u64, usize);

impl Leaf for f64 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Float(*self)
    }

    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        match value {
            Primitive::Float(number) => Ok(number),
            other => Err(mismatch("floating-point", &other)),
        }
    }
}

/// Largest `f32` strictly below `value`. `value` must be finite.
fn f32_below(value: f32) -> f32 {
    if value > 0.0 {
        f32::from_bits(value.to_bits() - 1)
    } else if value < 0.0 {
        f32::from_bits(value.to_bits() + 1)
    } else {
        -f32::from_bits(1)
    }
}

impl Leaf for f32 {
    fn to_primitive(&self) -> Primitive {
        Primitive::Float(f64::from(*self))
    }

    /// Narrows toward negative infinity, so a value below a bound stays below
    /// it after rounding.
    #[allow(clippy::cast_possible_truncation)]
    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        match value {
            Primitive::Float(number) => {
                let narrowed = number as f32;
                if number.is_finite() && !narrowed.is_finite() {
                    return Err(out_of_range(number, "f32"));
                }
                if narrowed.is_finite() && f64::from(narrowed) > number {
                    let below = f32_below(narrowed);
                    if !below.is_finite() {
                        return Err(out_of_range(number, "f32"));
                    }
                    return Ok(below);
                }
                Ok(narrowed)
            }
            other => Err(mismatch("floating-point", &other)),
        }
    }
}

impl Leaf for String {
    fn to_primitive(&self) -> Primitive {
        Primitive::String(self.clone())
    }

    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        match value {
            Primitive::String(text) => Ok(text),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl Leaf for Cow<'static, str> {
    fn to_primitive(&self) -> Primitive {
        Primitive::String(self.to_string())
    }

    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        String::from_primitive(value).map(Cow::Owned)
    }
}

impl Leaf for bool {
    fn to_primitive(&self) -> Primitive {
        Primitive::Bool(*self)
    }

    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        match value {
            Primitive::Bool(flag) => Ok(flag),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl Leaf for char {
    fn to_primitive(&self) -> Primitive {
        Primitive::Char(*self)
    }

    fn from_primitive(value: Primitive) -> Result<Self, StrategyFailure> {
        match value {
            Primitive::Char(ch) => Ok(ch),
            other => Err(mismatch("char", &other)),
        }
    }
}

// =============================================================================
// Leaves
// =============================================================================

macro_rules! impl_maskable_leaf {
    ($($ty:ty),*) => {
        $(
            impl Maskable for $ty {
                fn shape(&self) -> Shape {
                    Shape::Leaf
                }

                fn mask_with(&self, _walker: &mut Walker<'_>) -> Result<Self, MaskError> {
                    Ok(self.clone())
                }

                fn mask_annotated(
                    &self,
                    walker: &mut Walker<'_>,
                    annotation: &Annotation,
                ) -> Result<Self, MaskError> {
                    walker.mask_leaf(annotation, self)
                }
            }
        )*
    };
}

impl_maskable_leaf!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String,
    Cow<'static, str>
);

impl Maskable for () {
    fn shape(&self) -> Shape {
        Shape::Leaf
    }

    fn mask_with(&self, _walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        Ok(())
    }

    fn mask_annotated(
        &self,
        _walker: &mut Walker<'_>,
        _annotation: &Annotation,
    ) -> Result<Self, MaskError> {
        Ok(())
    }
}

impl<T: ?Sized + 'static> Maskable for PhantomData<T> {
    fn shape(&self) -> Shape {
        Shape::Leaf
    }

    fn mask_with(&self, _walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        Ok(PhantomData)
    }

    fn mask_annotated(
        &self,
        _walker: &mut Walker<'_>,
        _annotation: &Annotation,
    ) -> Result<Self, MaskError> {
        Ok(PhantomData)
    }
}

// =============================================================================
// Indirections
// =============================================================================

impl<T: Maskable> Maskable for Option<T> {
    fn shape(&self) -> Shape {
        Shape::Indirection
    }

    fn target_shape(&self) -> Shape {
        self.as_ref().map_or(Shape::Leaf, Maskable::target_shape)
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        self.as_ref().map(|value| value.mask_with(walker)).transpose()
    }

    fn mask_annotated(
        &self,
        walker: &mut Walker<'_>,
        annotation: &Annotation,
    ) -> Result<Self, MaskError> {
        self.as_ref()
            .map(|value| value.mask_annotated(walker, annotation))
            .transpose()
    }
}

macro_rules! impl_maskable_pointer {
    ($($pointer:ident),*) => {
        $(
            impl<T: Maskable> Maskable for $pointer<T> {
                fn shape(&self) -> Shape {
                    Shape::Indirection
                }

                fn target_shape(&self) -> Shape {
                    (**self).target_shape()
                }

                fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
                    (**self).mask_with(walker).map($pointer::new)
                }

                fn mask_annotated(
                    &self,
                    walker: &mut Walker<'_>,
                    annotation: &Annotation,
                ) -> Result<Self, MaskError> {
                    (**self).mask_annotated(walker, annotation).map($pointer::new)
                }
            }
        )*
    };
}

impl_maskable_pointer!(Box, Rc, Arc);

// =============================================================================
// Sequences
// =============================================================================

impl<T: Maskable> Maskable for Vec<T> {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        self.iter()
            .enumerate()
            .map(|(index, value)| walker.element(index, value))
            .collect()
    }
}

impl<T: Maskable, const N: usize> Maskable for [T; N] {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        let masked = self
            .iter()
            .enumerate()
            .map(|(index, value)| walker.element(index, value))
            .collect::<Result<Vec<T>, MaskError>>()?;
        let Ok(masked) = <[T; N]>::try_from(masked) else {
            unreachable!("masking preserves the array length");
        };
        Ok(masked)
    }
}

macro_rules! impl_maskable_tuple {
    ($(($($name:ident $index:tt),+)),*) => {
        $(
            impl<$($name: Maskable),+> Maskable for ($($name,)+) {
                fn shape(&self) -> Shape {
                    Shape::Sequence
                }

                fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
                    Ok(($(walker.element($index, &self.$index)?,)+))
                }
            }
        )*
    };
}

impl_maskable_tuple!(
    (A 0),
    (A 0, B 1),
    (A 0, B 1, C 2),
    (A 0, B 1, C 2, D 3),
    (A 0, B 1, C 2, D 3, E 4),
    (A 0, B 1, C 2, D 3, E 4, F 5)
);

impl<T: Maskable> Maskable for VecDeque<T> {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        self.iter()
            .enumerate()
            .map(|(index, value)| walker.element(index, value))
            .collect()
    }
}

// =============================================================================
// Maps
// =============================================================================

impl<K, V, S> Maskable for HashMap<K, V, S>
where
    K: Clone + Eq + Hash + 'static,
    V: Maskable,
    S: BuildHasher + Clone + 'static,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        let mut masked = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (ordinal, (key, value)) in self.iter().enumerate() {
            masked.insert(key.clone(), walker.entry(ordinal, key, value)?);
        }
        Ok(masked)
    }
}

impl<K, V> Maskable for BTreeMap<K, V>
where
    K: Clone + Ord + 'static,
    V: Maskable,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        let mut masked = BTreeMap::new();
        for (ordinal, (key, value)) in self.iter().enumerate() {
            masked.insert(key.clone(), walker.entry(ordinal, key, value)?);
        }
        Ok(masked)
    }
}
