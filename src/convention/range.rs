use derive_more::Display;

use crate::{
    attribute::{Number, NumberKind},
    node::Variable,
};

/// The attributes holding the valid range of a variable, in precedence order.
///
/// Attributes with a name ending in `max` only contribute to the maximum, those ending in `min` only contribute to the minimum.
pub const RANGE_ATTRIBUTES: [&str; 4] = ["valid_range", "actual_range", "valid_min", "valid_max"];

/// The name of the attribute holding the scale factor of packed values.
pub const SCALE_FACTOR: &str = "scale_factor";

/// The name of the attribute holding the offset of packed values.
pub const ADD_OFFSET: &str = "add_offset";

/// A closed range of numbers of one [`NumberKind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
#[display("[{minimum} … {maximum}]")]
pub struct NumberRange {
    kind: NumberKind,
    minimum: Number,
    maximum: Number,
}

impl NumberRange {
    /// Create a new range. The bounds are cast to `kind`.
    #[must_use]
    pub fn new(kind: NumberKind, minimum: Number, maximum: Number) -> Self {
        Self {
            kind,
            minimum: minimum.cast(kind),
            maximum: maximum.cast(kind),
        }
    }

    /// Return the kind of the bounds.
    #[must_use]
    pub const fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Return the minimum, inclusive.
    #[must_use]
    pub const fn minimum(&self) -> Number {
        self.minimum
    }

    /// Return the maximum, inclusive.
    #[must_use]
    pub const fn maximum(&self) -> Number {
        self.maximum
    }

    /// Return true if `value` is within the range.
    #[must_use]
    pub fn contains(&self, value: Number) -> bool {
        value.compare(&self.minimum).is_ge() && value.compare(&self.maximum).is_le()
    }
}

/// The range of valid values of a variable.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidRange {
    /// The bounds are packed values, before application of the [transfer function](super::TransferFunction).
    Packed(NumberRange),
    /// The bounds are measurements in real world units.
    Measurement {
        /// The bounds.
        range: NumberRange,
        /// The unit of measurement of the variable, if declared.
        unit: Option<String>,
    },
}

impl ValidRange {
    /// Return the bounds.
    #[must_use]
    pub const fn range(&self) -> &NumberRange {
        match self {
            Self::Packed(range) | Self::Measurement { range, .. } => range,
        }
    }

    /// Return true if the bounds are packed values.
    #[must_use]
    pub const fn is_packed(&self) -> bool {
        matches!(self, Self::Packed(_))
    }
}

/// Resolve the valid range of `variable` from the [`RANGE_ATTRIBUTES`].
///
/// The kind of the range is the widest kind of all values read. The largest finite value of a floating point kind is read as infinity.
/// The scan stops after the first attribute which completes both bounds.
///
/// The range is a [`ValidRange::Measurement`] if its kind is at least as wide as the data type of the variable and as
/// the kinds of the scale factor and offset attributes, otherwise it is [`ValidRange::Packed`].
pub(crate) fn valid_range_of(variable: &dyn Variable) -> Option<ValidRange> {
    let mut minimum: Option<Number> = None;
    let mut maximum: Option<Number> = None;
    let mut kind: Option<NumberKind> = None;
    for attribute in RANGE_ATTRIBUTES {
        for value in variable.numeric_attribute_values(attribute) {
            let value = value.max_as_infinity();
            let widest = kind.map_or(value.kind(), |kind| kind.widest(value.kind()));
            kind = Some(widest);
            let value = value.cast(widest);
            minimum = minimum.map(|minimum| minimum.cast(widest));
            maximum = maximum.map(|maximum| maximum.cast(widest));
            if !attribute.ends_with("max") && minimum.map_or(true, |m| value.compare(&m).is_lt()) {
                minimum = Some(value);
            }
            if !attribute.ends_with("min") && maximum.map_or(true, |m| value.compare(&m).is_gt()) {
                maximum = Some(value);
            }
        }
        if let (Some(minimum), Some(maximum), Some(kind)) = (minimum, maximum, kind) {
            let range = NumberRange::new(kind, minimum, maximum);
            let packing_kind = std::cmp::max(
                variable.attribute_kind(SCALE_FACTOR),
                variable.attribute_kind(ADD_OFFSET),
            );
            let data_kind = variable.data_type().number_kind();
            return Some(if Some(kind) >= data_kind && Some(kind) >= packing_kind {
                ValidRange::Measurement {
                    range,
                    unit: variable.unit(),
                }
            } else {
                ValidRange::Packed(range)
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_range() {
        let range = NumberRange::new(NumberKind::Float, Number::Short(0), Number::Int(100));
        assert_eq!(range.minimum(), Number::Float(0.0));
        assert_eq!(range.maximum(), Number::Float(100.0));
        assert!(range.contains(Number::Byte(50)));
        assert!(!range.contains(Number::Double(100.5)));
        assert_eq!(range.to_string(), "[0 … 100]");
    }
}
