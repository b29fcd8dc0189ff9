use std::cmp::Ordering;

use derive_more::{Display, From};

/// The kind of a [`Number`].
///
/// Kinds are totally ordered from the narrowest to the widest: any kind can be widened to a kind greater or equal to itself.
/// This is the lattice used to find the common type of values read from different attributes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub enum NumberKind {
    /// A signed 8-bit integer.
    #[display("byte")]
    Byte,
    /// A signed 16-bit integer.
    #[display("short")]
    Short,
    /// A signed 32-bit integer.
    #[display("int")]
    Int,
    /// A signed 64-bit integer.
    #[display("long")]
    Long,
    /// An IEEE 754 single-precision floating point number.
    #[display("float")]
    Float,
    /// An IEEE 754 double-precision floating point number.
    #[display("double")]
    Double,
}

impl NumberKind {
    /// Return the widest of `self` and `other`.
    #[must_use]
    pub fn widest(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }

    /// Return true if this kind is a floating point kind.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

/// A number of one of the [`NumberKind`]s.
///
/// Equality is kind sensitive: `Number::Short(1)` and `Number::Int(1)` are not equal.
/// Floating point numbers are compared by their bits, so `NaN` is equal to itself.
/// Use [`Number::compare`] for a numeric comparison across kinds.
#[derive(Copy, Clone, Debug, Display, From)]
pub enum Number {
    /// A signed 8-bit integer.
    Byte(i8),
    /// A signed 16-bit integer.
    Short(i16),
    /// A signed 32-bit integer.
    Int(i32),
    /// A signed 64-bit integer.
    Long(i64),
    /// A single-precision floating point number.
    Float(f32),
    /// A double-precision floating point number.
    Double(f64),
}

impl Number {
    /// Return the kind of this number.
    #[must_use]
    pub const fn kind(&self) -> NumberKind {
        match self {
            Self::Byte(_) => NumberKind::Byte,
            Self::Short(_) => NumberKind::Short,
            Self::Int(_) => NumberKind::Int,
            Self::Long(_) => NumberKind::Long,
            Self::Float(_) => NumberKind::Float,
            Self::Double(_) => NumberKind::Double,
        }
    }

    /// Return the number as a `f64`.
    ///
    /// This is exact for all kinds except [`Number::Long`] values beyond 2<sup>53</sup>.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        match *self {
            Self::Byte(v) => f64::from(v),
            Self::Short(v) => f64::from(v),
            Self::Int(v) => f64::from(v),
            Self::Long(v) => v as f64,
            Self::Float(v) => f64::from(v),
            Self::Double(v) => v,
        }
    }

    /// Return the number as an `i64`, or [`None`] if this is a floating point number.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(i64::from(v)),
            Self::Short(v) => Some(i64::from(v)),
            Self::Int(v) => Some(i64::from(v)),
            Self::Long(v) => Some(v),
            Self::Float(_) | Self::Double(_) => None,
        }
    }

    /// Cast this number to `kind`.
    ///
    /// Widening casts (to a kind greater or equal to [`kind()`](Self::kind)) preserve the value, except for the precision of
    /// very large [`Number::Long`] values cast to a floating point kind.
    /// Narrowing casts saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn cast(self, kind: NumberKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        if let Some(integer) = self.to_i64() {
            match kind {
                NumberKind::Byte => Self::Byte(saturate(integer, i8::MIN, i8::MAX)),
                NumberKind::Short => Self::Short(saturate(integer, i16::MIN, i16::MAX)),
                NumberKind::Int => Self::Int(saturate(integer, i32::MIN, i32::MAX)),
                NumberKind::Long => Self::Long(integer),
                NumberKind::Float => Self::Float(integer as f32),
                NumberKind::Double => Self::Double(integer as f64),
            }
        } else {
            let value = self.to_f64();
            match kind {
                NumberKind::Byte => Self::Byte(value as i8),
                NumberKind::Short => Self::Short(value as i16),
                NumberKind::Int => Self::Int(value as i32),
                NumberKind::Long => Self::Long(value as i64),
                NumberKind::Float => Self::Float(value as f32),
                NumberKind::Double => Self::Double(value),
            }
        }
    }

    /// Compare two numbers after widening both of them to their widest kind.
    ///
    /// Floating point numbers are compared with a total order (`-0.0 < 0.0`, `NaN` after positive infinity).
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let kind = self.kind().widest(other.kind());
        match (self.cast(kind), other.cast(kind)) {
            (Self::Float(a), Self::Float(b)) => a.total_cmp(&b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(&b),
            (a, b) => a.to_i64().cmp(&b.to_i64()),
        }
    }

    /// Replace the largest finite value of a floating point kind by the infinity of the same sign.
    ///
    /// Some producers write `±MAX` instead of `±∞` for unbounded ranges.
    #[must_use]
    pub fn max_as_infinity(self) -> Self {
        match self {
            Self::Float(v) if v == f32::MAX => Self::Float(f32::INFINITY),
            Self::Float(v) if v == -f32::MAX => Self::Float(f32::NEG_INFINITY),
            Self::Double(v) if v == f64::MAX => Self::Double(f64::INFINITY),
            Self::Double(v) if v == -f64::MAX => Self::Double(f64::NEG_INFINITY),
            other => other,
        }
    }

    fn bits(&self) -> u64 {
        match *self {
            Self::Float(v) => u64::from(v.to_bits()),
            Self::Double(v) => v.to_bits(),
            #[allow(clippy::cast_sign_loss)]
            other => other.to_i64().map_or(0, |v| v as u64),
        }
    }
}

fn saturate<T: TryFrom<i64>>(value: i64, min: T, max: T) -> T {
    T::try_from(value).unwrap_or(if value < 0 { min } else { max })
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.bits() == other.bits()
    }
}

impl Eq for Number {}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_kind_lattice() {
        assert!(NumberKind::Byte < NumberKind::Short);
        assert!(NumberKind::Long < NumberKind::Float);
        assert_eq!(NumberKind::Int.widest(NumberKind::Double), NumberKind::Double);
        assert_eq!(NumberKind::Float.widest(NumberKind::Short), NumberKind::Float);
        assert!(NumberKind::Float.is_float());
        assert!(!NumberKind::Long.is_float());
    }

    #[test]
    fn number_cast() {
        assert_eq!(Number::Short(-999).cast(NumberKind::Double), Number::Double(-999.0));
        assert_eq!(Number::Int(300).cast(NumberKind::Byte), Number::Byte(i8::MAX));
        assert_eq!(Number::Double(2.5).cast(NumberKind::Int), Number::Int(2));
        assert_eq!(Number::Float(0.5).cast(NumberKind::Double), Number::Double(0.5));
    }

    #[test]
    fn number_equality_is_kind_sensitive() {
        assert_ne!(Number::Short(1), Number::Int(1));
        assert_eq!(Number::Float(f32::NAN), Number::Float(f32::NAN));
        assert_eq!(Number::Long(-5), Number::from(-5i64));
    }

    #[test]
    fn number_compare() {
        assert_eq!(Number::Byte(3).compare(&Number::Double(2.5)), Ordering::Greater);
        assert_eq!(Number::Int(-1).compare(&Number::Long(-1)), Ordering::Equal);
        assert_eq!(Number::Float(-0.0).compare(&Number::Float(0.0)), Ordering::Less);
    }

    #[test]
    fn number_max_as_infinity() {
        assert_eq!(Number::Float(f32::MAX).max_as_infinity(), Number::Float(f32::INFINITY));
        assert_eq!(Number::Double(-f64::MAX).max_as_infinity(), Number::Double(f64::NEG_INFINITY));
        assert_eq!(Number::Int(i32::MAX).max_as_infinity(), Number::Int(i32::MAX));
    }
}
