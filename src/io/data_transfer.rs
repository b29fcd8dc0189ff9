use derive_more::{Display, From};
use thiserror::Error;

use crate::{
    data_type::DataType,
    error::{DataStoreContentError, DataStoreError},
};

use super::DataInput;

/// The kind of the primitive elements read by a [`HyperRectangleReader`](super::HyperRectangleReader).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum ElementKind {
    /// Signed 8-bit integers.
    #[display("byte")]
    Byte,
    /// 16-bit characters (UTF-16 code units).
    #[display("char")]
    Char,
    /// Signed 16-bit integers.
    #[display("short")]
    Short,
    /// Signed 32-bit integers.
    #[display("int")]
    Int,
    /// Signed 64-bit integers.
    #[display("long")]
    Long,
    /// Single-precision floating point numbers.
    #[display("float")]
    Float,
    /// Double-precision floating point numbers.
    #[display("double")]
    Double,
}

impl ElementKind {
    /// Return the base 2 logarithm of the element size in bytes.
    #[must_use]
    pub const fn data_size_shift(self) -> u32 {
        match self {
            Self::Byte => 0,
            Self::Char | Self::Short => 1,
            Self::Int | Self::Float => 2,
            Self::Long | Self::Double => 3,
        }
    }

    /// Return the element size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        1 << self.data_size_shift()
    }
}

impl TryFrom<DataType> for ElementKind {
    type Error = UnsupportedElementKindError;

    fn try_from(data_type: DataType) -> Result<Self, Self::Error> {
        data_type
            .element_kind()
            .ok_or(UnsupportedElementKindError(data_type))
    }
}

/// An unsupported element kind error. Raised for data types which cannot be read as primitive elements.
#[derive(Copy, Clone, Debug, Error)]
#[error("data type {_0} cannot be read as primitive elements")]
pub struct UnsupportedElementKindError(pub DataType);

impl From<UnsupportedElementKindError> for DataStoreError {
    fn from(error: UnsupportedElementKindError) -> Self {
        Self::Content(DataStoreContentError::new(error.to_string()))
    }
}

/// One-dimensional array of primitive elements, the result of a [`HyperRectangleReader::read`](super::HyperRectangleReader::read).
#[derive(Clone, Debug, PartialEq, From)]
pub enum PrimitiveArray {
    /// Signed 8-bit integers.
    Byte(Vec<i8>),
    /// 16-bit characters.
    Char(Vec<u16>),
    /// Signed 16-bit integers.
    Short(Vec<i16>),
    /// Signed 32-bit integers.
    Int(Vec<i32>),
    /// Signed 64-bit integers.
    Long(Vec<i64>),
    /// Single-precision floating point numbers.
    Float(Vec<f32>),
    /// Double-precision floating point numbers.
    Double(Vec<f64>),
}

macro_rules! primitive_array_accessor {
    ($name:ident, $variant:ident, $type:ty) => {
        #[doc = concat!("Return the elements if this is a [`PrimitiveArray::", stringify!($variant), "`] array.")]
        #[must_use]
        pub fn $name(&self) -> Option<&[$type]> {
            match self {
                Self::$variant(values) => Some(values),
                _ => None,
            }
        }
    };
}

impl PrimitiveArray {
    /// Return the kind of the elements.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Byte(_) => ElementKind::Byte,
            Self::Char(_) => ElementKind::Char,
            Self::Short(_) => ElementKind::Short,
            Self::Int(_) => ElementKind::Int,
            Self::Long(_) => ElementKind::Long,
            Self::Float(_) => ElementKind::Float,
            Self::Double(_) => ElementKind::Double,
        }
    }

    /// Return the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(values) => values.len(),
            Self::Char(values) => values.len(),
            Self::Short(values) => values.len(),
            Self::Int(values) => values.len(),
            Self::Long(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
        }
    }

    /// Return true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if the elements are floating point numbers.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_) | Self::Double(_))
    }

    /// Return the elements if they are of type `T`.
    #[must_use]
    pub fn as_slice<T: DataTransfer>(&self) -> Option<&[T]> {
        T::as_values(self)
    }

    primitive_array_accessor!(as_byte, Byte, i8);
    primitive_array_accessor!(as_char, Char, u16);
    primitive_array_accessor!(as_short, Short, i16);
    primitive_array_accessor!(as_int, Int, i32);
    primitive_array_accessor!(as_long, Long, i64);
    primitive_array_accessor!(as_float, Float, f32);
    primitive_array_accessor!(as_double, Double, f64);
}

/// Bulk transfer of primitive elements from a [`DataInput`] into an output array.
///
/// The elements are read directly into the bytes of the output array, then swapped in place if the input
/// byte order differs from the CPU byte order.
pub trait DataTransfer: bytemuck::Pod + Send + Sync {
    /// The kind of the elements.
    const KIND: ElementKind;

    /// Allocate an output array of `length` zeroed elements.
    #[must_use]
    fn allocate(length: usize) -> Vec<Self> {
        bytemuck::zeroed_vec(length)
    }

    /// Read `destination.len()` elements from the current position of `input` into `destination`.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if `input` fails or ends before `destination` is filled.
    fn transfer(input: &mut dyn DataInput, destination: &mut [Self]) -> std::io::Result<()> {
        input.read_fully(bytemuck::cast_slice_mut(destination))?;
        if input.byte_order() != super::NATIVE_ENDIAN {
            Self::swap_bytes_in_place(destination);
        }
        Ok(())
    }

    /// Reverse the byte order of every element.
    fn swap_bytes_in_place(values: &mut [Self]);

    /// Wrap `values` in a [`PrimitiveArray`].
    fn wrap(values: Vec<Self>) -> PrimitiveArray;

    /// Return the elements of `array` if they are of this type.
    fn as_values(array: &PrimitiveArray) -> Option<&[Self]>;

    /// Return the elements of `array` if they are of this type, or return `array` back.
    ///
    /// # Errors
    /// Returns `array` if its elements are not of this type.
    fn into_values(array: PrimitiveArray) -> Result<Vec<Self>, PrimitiveArray>;
}

macro_rules! impl_data_transfer {
    ($type:ty, $variant:ident, $swap:expr) => {
        impl DataTransfer for $type {
            const KIND: ElementKind = ElementKind::$variant;

            fn swap_bytes_in_place(values: &mut [Self]) {
                let swap: fn($type) -> $type = $swap;
                for value in values {
                    *value = swap(*value);
                }
            }

            fn wrap(values: Vec<Self>) -> PrimitiveArray {
                PrimitiveArray::$variant(values)
            }

            fn as_values(array: &PrimitiveArray) -> Option<&[Self]> {
                match array {
                    PrimitiveArray::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn into_values(array: PrimitiveArray) -> Result<Vec<Self>, PrimitiveArray> {
                match array {
                    PrimitiveArray::$variant(values) => Ok(values),
                    other => Err(other),
                }
            }
        }
    };
}

impl_data_transfer!(i8, Byte, |value| value);
impl_data_transfer!(u16, Char, u16::swap_bytes);
impl_data_transfer!(i16, Short, i16::swap_bytes);
impl_data_transfer!(i32, Int, i32::swap_bytes);
impl_data_transfer!(i64, Long, i64::swap_bytes);
impl_data_transfer!(f32, Float, |value| f32::from_bits(value.to_bits().swap_bytes()));
impl_data_transfer!(f64, Double, |value| f64::from_bits(value.to_bits().swap_bytes()));
