//! Attribute values.
//!
//! An attribute bag of a [`Node`](crate::node::Node) maps attribute names to an [`AttributeValue`].
//! [`AttributeValue`] is a tagged union of numeric vectors, strings and booleans.
//! Its accessors fail explicitly with an [`AttributeTypeError`] if the value has another type.

mod number;

pub use number::{Number, NumberKind};

use derive_more::Display;
use thiserror::Error;

/// A vector of numbers which all have the same [`NumberKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberVector {
    kind: NumberKind,
    values: Vec<Number>,
}

impl NumberVector {
    /// Create a new number vector of `kind`. The `values` are cast to `kind`.
    #[must_use]
    pub fn new(kind: NumberKind, values: impl IntoIterator<Item = Number>) -> Self {
        Self {
            kind,
            values: values.into_iter().map(|value| value.cast(kind)).collect(),
        }
    }

    /// Return the kind of the numbers.
    #[must_use]
    pub const fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Return the numbers.
    #[must_use]
    pub fn values(&self) -> &[Number] {
        &self.values
    }

    /// Return the numbers as `f64`.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().map(Number::to_f64).collect()
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

macro_rules! impl_number_vector_from {
    ($type:ty, $kind:ident) => {
        impl From<Vec<$type>> for NumberVector {
            fn from(values: Vec<$type>) -> Self {
                Self {
                    kind: NumberKind::$kind,
                    values: values.into_iter().map(Number::$kind).collect(),
                }
            }
        }

        impl From<$type> for NumberVector {
            fn from(value: $type) -> Self {
                Self {
                    kind: NumberKind::$kind,
                    values: vec![Number::$kind(value)],
                }
            }
        }

        impl From<Vec<$type>> for AttributeValue {
            fn from(values: Vec<$type>) -> Self {
                Self::Numbers(values.into())
            }
        }

        impl From<$type> for AttributeValue {
            fn from(value: $type) -> Self {
                Self::Numbers(value.into())
            }
        }
    };
}

impl_number_vector_from!(i8, Byte);
impl_number_vector_from!(i16, Short);
impl_number_vector_from!(i32, Int);
impl_number_vector_from!(i64, Long);
impl_number_vector_from!(f32, Float);
impl_number_vector_from!(f64, Double);

/// The type of an [`AttributeValue`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum AttributeType {
    /// A vector of numbers.
    #[display("numeric")]
    Numeric,
    /// One or more strings.
    #[display("text")]
    Text,
    /// A boolean.
    #[display("boolean")]
    Boolean,
}

/// An attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// One or more numbers of the same kind.
    Numbers(NumberVector),
    /// One or more strings.
    Text(Vec<String>),
    /// A boolean.
    Boolean(bool),
}

/// An attribute type mismatch error.
#[derive(Copy, Clone, Debug, Error)]
#[error("expected a {expected} attribute value, got {found}")]
pub struct AttributeTypeError {
    expected: AttributeType,
    found: AttributeType,
}

impl AttributeTypeError {
    /// Create a new attribute type error.
    #[must_use]
    pub const fn new(expected: AttributeType, found: AttributeType) -> Self {
        Self { expected, found }
    }
}

impl AttributeValue {
    /// Create a text attribute value with a single string.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(vec![value.into()])
    }

    /// Return the type of this value.
    #[must_use]
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Numbers(_) => AttributeType::Numeric,
            Self::Text(_) => AttributeType::Text,
            Self::Boolean(_) => AttributeType::Boolean,
        }
    }

    /// Return the declared kind of the numbers, or [`None`] if the value is not numeric.
    #[must_use]
    pub fn number_kind(&self) -> Option<NumberKind> {
        match self {
            Self::Numbers(numbers) => Some(numbers.kind()),
            _ => None,
        }
    }

    /// Return the numbers.
    ///
    /// # Errors
    /// Returns an [`AttributeTypeError`] if the value is not numeric.
    pub fn as_numbers(&self) -> Result<&NumberVector, AttributeTypeError> {
        match self {
            Self::Numbers(numbers) => Ok(numbers),
            other => Err(AttributeTypeError::new(
                AttributeType::Numeric,
                other.attribute_type(),
            )),
        }
    }

    /// Return the first string.
    ///
    /// # Errors
    /// Returns an [`AttributeTypeError`] if the value is not text.
    pub fn as_text(&self) -> Result<&str, AttributeTypeError> {
        match self {
            Self::Text(strings) => Ok(strings.first().map_or("", String::as_str)),
            other => Err(AttributeTypeError::new(
                AttributeType::Text,
                other.attribute_type(),
            )),
        }
    }

    /// Return the boolean.
    ///
    /// # Errors
    /// Returns an [`AttributeTypeError`] if the value is not a boolean.
    pub fn as_bool(&self) -> Result<bool, AttributeTypeError> {
        match self {
            Self::Boolean(value) => Ok(*value),
            other => Err(AttributeTypeError::new(
                AttributeType::Boolean,
                other.attribute_type(),
            )),
        }
    }

    /// Return the value as numbers, parsing text if needed.
    ///
    /// Strings which do not parse as a number are skipped. Booleans have no numeric value.
    #[must_use]
    pub fn numeric_values(&self) -> Vec<Number> {
        match self {
            Self::Numbers(numbers) => numbers.values().to_vec(),
            Self::Text(strings) => strings
                .iter()
                .filter_map(|string| string.trim().parse::<f64>().ok())
                .map(Number::Double)
                .collect(),
            Self::Boolean(_) => Vec::new(),
        }
    }

    /// Return the value as a string, formatting a single number if needed.
    ///
    /// Returns [`None`] for empty or blank strings, multi-valued numbers and booleans.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(strings) => strings
                .first()
                .map(|string| string.trim())
                .filter(|string| !string.is_empty())
                .map(str::to_string),
            Self::Numbers(numbers) if numbers.len() == 1 => {
                Some(numbers.values()[0].to_string())
            }
            _ => None,
        }
    }
}

impl From<NumberVector> for AttributeValue {
    fn from(numbers: NumberVector) -> Self {
        Self::Numbers(numbers)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(vec![value])
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_value_accessors() {
        let value = AttributeValue::from(vec![0i16, 100]);
        assert_eq!(value.number_kind(), Some(NumberKind::Short));
        assert_eq!(value.as_numbers().unwrap().to_f64_vec(), vec![0.0, 100.0]);
        assert!(value.as_text().is_err());
        assert!(value.as_bool().is_err());
        assert_eq!(value.to_text(), None);

        let value = AttributeValue::text(" lambert_conformal_conic ");
        assert_eq!(value.as_text().unwrap(), " lambert_conformal_conic ");
        assert_eq!(value.to_text().as_deref(), Some("lambert_conformal_conic"));
        assert_eq!(
            value.as_numbers().unwrap_err().to_string(),
            "expected a numeric attribute value, got text"
        );

        assert!(AttributeValue::Boolean(true).as_bool().unwrap());
    }

    #[test]
    fn attribute_value_numeric_values() {
        assert_eq!(
            AttributeValue::from(-999i32).numeric_values(),
            vec![Number::Int(-999)]
        );
        assert_eq!(
            AttributeValue::Text(vec!["12.5".to_string(), "n/a".to_string()]).numeric_values(),
            vec![Number::Double(12.5)]
        );
        assert!(AttributeValue::Boolean(false).numeric_values().is_empty());
        assert_eq!(AttributeValue::from(0.5f32).to_text().as_deref(), Some("0.5"));
    }

    #[test]
    fn number_vector_casts_values() {
        let vector = NumberVector::new(NumberKind::Double, [Number::Int(1), Number::Float(2.5)]);
        assert_eq!(vector.values(), &[Number::Double(1.0), Number::Double(2.5)]);
        assert_eq!(vector.len(), 2);
        assert!(!vector.is_empty());
    }
}
