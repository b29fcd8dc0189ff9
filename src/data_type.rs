//! Data types of stored variables.
//!
//! These are the primitive types of the netCDF family of formats.
//! A [`DataType`] maps to the [`NumberKind`] used when comparing attribute types, the [`ElementKind`] read by a
//! [`HyperRectangleReader`](crate::io::HyperRectangleReader), and tells whether the variable can back a raster.

use derive_more::Display;

use crate::{attribute::NumberKind, io::ElementKind};

/// The data type of a variable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
#[non_exhaustive]
#[rustfmt::skip]
pub enum DataType {
    /// `byte` integer in `[-2^7, 2^7-1]`.
    #[display("byte")]
    Byte,
    /// `ubyte` integer in `[0, 2^8-1]`.
    #[display("ubyte")]
    UByte,
    /// `char` 8-bit character.
    #[display("char")]
    Char,
    /// `short` integer in `[-2^15, 2^15-1]`.
    #[display("short")]
    Short,
    /// `ushort` integer in `[0, 2^16-1]`.
    #[display("ushort")]
    UShort,
    /// `int` integer in `[-2^31, 2^31-1]`.
    #[display("int")]
    Int,
    /// `uint` integer in `[0, 2^32-1]`.
    #[display("uint")]
    UInt,
    /// `int64` integer in `[-2^63, 2^63-1]`.
    #[display("int64")]
    Int64,
    /// `uint64` integer in `[0, 2^64-1]`.
    #[display("uint64")]
    UInt64,
    /// `float` IEEE 754 single-precision floating point.
    #[display("float")]
    Float,
    /// `double` IEEE 754 double-precision floating point.
    #[display("double")]
    Double,
    /// `string` variable length string.
    #[display("string")]
    String,
    /// A boolean, not a netCDF type but found in some derived formats.
    #[display("boolean")]
    Boolean,
}

impl DataType {
    /// Return the size in bytes of one stored element, or [`None`] for variable length types.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            Self::Byte | Self::UByte | Self::Char | Self::Boolean => Some(1),
            Self::Short | Self::UShort => Some(2),
            Self::Int | Self::UInt | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double => Some(8),
            Self::String => None,
        }
    }

    /// Return true for unsigned integer types.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UByte | Self::UShort | Self::UInt | Self::UInt64)
    }

    /// Return the kind of the numbers stored by this data type, or [`None`] if the type is not numeric.
    ///
    /// Unsigned types map to the signed kind of the same width: the kind describes the storage width, not the value range.
    #[must_use]
    pub const fn number_kind(&self) -> Option<NumberKind> {
        match self {
            Self::Byte | Self::UByte => Some(NumberKind::Byte),
            Self::Short | Self::UShort => Some(NumberKind::Short),
            Self::Int | Self::UInt => Some(NumberKind::Int),
            Self::Int64 | Self::UInt64 => Some(NumberKind::Long),
            Self::Float => Some(NumberKind::Float),
            Self::Double => Some(NumberKind::Double),
            Self::Char | Self::String | Self::Boolean => None,
        }
    }

    /// Return the element kind to use for reading this data type, or [`None`] if it cannot be read as primitive values.
    #[must_use]
    pub const fn element_kind(&self) -> Option<ElementKind> {
        match self {
            Self::Byte | Self::UByte | Self::Char => Some(ElementKind::Byte),
            Self::Short | Self::UShort => Some(ElementKind::Short),
            Self::Int | Self::UInt => Some(ElementKind::Int),
            Self::Int64 | Self::UInt64 => Some(ElementKind::Long),
            Self::Float => Some(ElementKind::Float),
            Self::Double => Some(ElementKind::Double),
            Self::String | Self::Boolean => None,
        }
    }

    /// Return true if this data type maps to a raster sample type.
    ///
    /// Characters and strings are excluded since two-dimensional character arrays are often annotations.
    /// 64-bit and unsigned 32-bit integers have no raster sample type.
    #[must_use]
    pub const fn is_raster_compatible(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::UByte | Self::Short | Self::UShort | Self::Int | Self::Float | Self::Double
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_mappings() {
        assert_eq!(DataType::UShort.number_kind(), Some(NumberKind::Short));
        assert_eq!(DataType::Char.number_kind(), None);
        assert_eq!(DataType::Char.element_kind(), Some(ElementKind::Byte));
        assert_eq!(DataType::String.element_kind(), None);
        assert_eq!(DataType::Double.size(), Some(8));
        assert!(DataType::UInt.is_unsigned());
        assert!(DataType::Float.is_raster_compatible());
        assert!(!DataType::Char.is_raster_compatible());
        assert!(!DataType::Int64.is_raster_compatible());
        assert_eq!(DataType::Int64.to_string(), "int64");
    }
}
