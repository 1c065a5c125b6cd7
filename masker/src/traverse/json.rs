//! `Maskable` for `serde_json::Value`.
//!
//! Objects follow map rules (string keys matched against field rules), arrays
//! follow sequence rules, and `null` is an absent indirection. Strings,
//! numbers and booleans are leaves. A masked number that cannot be stored in
//! JSON (NaN or infinite) is a strategy error.

use serde_json::{Map, Number, Value};

use super::{Maskable, Shape, Walker};
use crate::{annotation::Annotation, error::MaskError, strategy::Primitive, StrategyFailure};

fn number_to_primitive(number: &Number) -> Primitive {
    if let Some(value) = number.as_i64() {
        Primitive::Int(value)
    } else if let Some(value) = number.as_u64() {
        Primitive::Uint(value)
    } else if let Some(value) = number.as_f64() {
        Primitive::Float(value)
    } else {
        Primitive::String(number.to_string())
    }
}

fn leaf_to_primitive(value: &Value) -> Option<Primitive> {
    match value {
        Value::String(text) => Some(Primitive::String(text.clone())),
        Value::Number(number) => Some(number_to_primitive(number)),
        Value::Bool(flag) => Some(Primitive::Bool(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn primitive_to_value(value: Primitive) -> Result<Value, StrategyFailure> {
    Ok(match value {
        Primitive::String(text) => Value::String(text),
        Primitive::Int(number) => Value::from(number),
        Primitive::Uint(number) => Value::from(number),
        Primitive::Float(number) => Number::from_f64(number).map(Value::Number).ok_or_else(|| {
            StrategyFailure::custom(format!("masked value {number} is not a valid JSON number"))
        })?,
        Primitive::Bool(flag) => Value::Bool(flag),
        Primitive::Char(ch) => Value::String(ch.to_string()),
    })
}

impl Maskable for Value {
    fn shape(&self) -> Shape {
        match self {
            Self::Null => Shape::Indirection,
            Self::Array(_) => Shape::Sequence,
            Self::Object(_) => Shape::Map,
            Self::String(_) | Self::Number(_) | Self::Bool(_) => Shape::Leaf,
        }
    }

    fn mask_with(&self, walker: &mut Walker<'_>) -> Result<Self, MaskError> {
        match self {
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| walker.element(index, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Array),
            Self::Object(entries) => {
                let mut masked = Map::new();
                for (ordinal, (key, value)) in entries.iter().enumerate() {
                    masked.insert(key.clone(), walker.entry(ordinal, key, value)?);
                }
                Ok(Self::Object(masked))
            }
            leaf => Ok(leaf.clone()),
        }
    }

    fn mask_annotated(
        &self,
        walker: &mut Walker<'_>,
        annotation: &Annotation,
    ) -> Result<Self, MaskError> {
        let Some(primitive) = leaf_to_primitive(self) else {
            if self.shape().is_composite() {
                walker.unsupported(annotation, self.shape());
            }
            return self.mask_with(walker);
        };
        let masked = walker.apply(annotation, primitive)?;
        primitive_to_value(masked).map_err(|failure| walker.fail(annotation, failure))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Number, Value};

    use super::{leaf_to_primitive, primitive_to_value};
    use crate::Primitive;

    #[test]
    fn numbers_map_to_their_category() {
        assert_eq!(leaf_to_primitive(&json!(-3)), Some(Primitive::Int(-3)));
        assert_eq!(
            leaf_to_primitive(&json!(u64::MAX)),
            Some(Primitive::Uint(u64::MAX))
        );
        assert_eq!(leaf_to_primitive(&json!(1.5)), Some(Primitive::Float(1.5)));
        assert_eq!(leaf_to_primitive(&Value::Null), None);
    }

    #[test]
    fn non_finite_float_is_rejected() {
        assert!(primitive_to_value(Primitive::Float(f64::NAN)).is_err());
        assert_eq!(
            primitive_to_value(Primitive::Float(2.5)).unwrap(),
            Value::Number(Number::from_f64(2.5).unwrap())
        );
    }

    #[test]
    fn char_becomes_string() {
        assert_eq!(
            primitive_to_value(Primitive::Char('x')).unwrap(),
            Value::String("x".to_string())
        );
    }
}
