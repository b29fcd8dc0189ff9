use bytes::Bytes;

use crate::{
    data_type::DataType,
    error::{ArithmeticOverflowError, DataStoreContentError, DataStoreError},
};

use super::{
    DataInput, DataTransfer, ElementKind, Endianness, MemoryDataInput, PrimitiveArray, Region,
};

/// A reader of hyperrectangles of one variable stored contiguously in a [`DataInput`].
///
/// The reader is bound to one [`ElementKind`] and to the byte offset of the first element of the variable (the `origin`).
/// Each [`read`](HyperRectangleReader::read) seeks once per contiguous run of the [`Region`], so reading a whole
/// variable or whole rows of a variable requires a single seek.
///
/// A reader is not shareable between threads while reading: concurrent reads require distinct readers.
#[derive(Debug)]
pub struct HyperRectangleReader<I> {
    input: I,
    kind: ElementKind,
    origin: u64,
}

fn overflow(quantity: &'static str) -> ArithmeticOverflowError {
    ArithmeticOverflowError::new(quantity)
}

impl<I: DataInput> HyperRectangleReader<I> {
    /// Create a new reader of elements of `data_type` stored from the byte `origin` of `input`.
    ///
    /// # Errors
    /// Returns a [`DataStoreError::Content`] if `data_type` cannot be read as primitive elements.
    pub fn new(data_type: DataType, input: I, origin: u64) -> Result<Self, DataStoreError> {
        let kind = ElementKind::try_from(data_type)?;
        Ok(Self::with_element_kind(kind, input, origin))
    }

    /// Create a new reader of elements of `kind` stored from the byte `origin` of `input`.
    #[must_use]
    pub fn with_element_kind(kind: ElementKind, input: I, origin: u64) -> Self {
        Self {
            input,
            kind,
            origin,
        }
    }

    /// Return the byte offset of the first element of the variable.
    ///
    /// Readers over the same input can be sorted by origin to minimise the seek distance of successive reads.
    #[must_use]
    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Return the kind of the elements.
    #[must_use]
    pub fn element_kind(&self) -> ElementKind {
        self.kind
    }

    /// Return the element size in bytes.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.kind.size()
    }

    /// Return the identifier of the input, for diagnostics.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.input.filename()
    }

    /// Return the input.
    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Return a mutable reference to the input.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Unwrap this reader, returning the input.
    pub fn into_inner(self) -> I {
        self.input
    }

    /// Read the elements of `region`.
    ///
    /// The elements are returned in storage order, which is the row-major order of the declared dimensions.
    ///
    /// # Errors
    /// Returns a [`DataStoreError`] if
    ///  - the input fails to seek or read,
    ///  - a byte offset of `region` is not representable as [`u64`].
    pub fn read(&mut self, region: &Region) -> Result<PrimitiveArray, DataStoreError> {
        Ok(match self.kind {
            ElementKind::Byte => self.read_elements::<i8>(region)?.into(),
            ElementKind::Char => self.read_elements::<u16>(region)?.into(),
            ElementKind::Short => self.read_elements::<i16>(region)?.into(),
            ElementKind::Int => self.read_elements::<i32>(region)?.into(),
            ElementKind::Long => self.read_elements::<i64>(region)?.into(),
            ElementKind::Float => self.read_elements::<f32>(region)?.into(),
            ElementKind::Double => self.read_elements::<f64>(region)?.into(),
        })
    }

    /// Read the elements of `region` as a vector of `T`.
    ///
    /// # Errors
    /// Returns a [`DataStoreError`] if
    ///  - `T` does not match the [element kind](HyperRectangleReader::element_kind) of the reader,
    ///  - the input fails to seek or read,
    ///  - a byte offset of `region` is not representable as [`u64`].
    pub fn read_elements<T: DataTransfer>(
        &mut self,
        region: &Region,
    ) -> Result<Vec<T>, DataStoreError> {
        if T::KIND != self.kind {
            return Err(DataStoreContentError::new(format!(
                "{}: cannot read {} elements as {}",
                self.input.filename(),
                self.kind,
                T::KIND
            ))
            .into());
        }
        let shift = self.kind.data_size_shift();
        let contiguous_data_dimension = region.contiguous_data_dimension();
        let contiguous_data_length = region.contiguous_data_length();
        let length = usize::try_from(contiguous_data_length)
            .map_err(|_| overflow("contiguous data length"))?;
        let size = &region.target_size()[contiguous_data_dimension..];
        let strides = (contiguous_data_dimension..region.dimensionality())
            .map(|dimension| {
                region
                    .skip(dimension)
                    .checked_add(contiguous_data_length)
                    .and_then(|stride| stride.checked_mul(1 << shift))
            })
            .collect::<Option<Vec<u64>>>()
            .ok_or(overflow("stride"))?;
        let mut position = region
            .start_at()
            .checked_mul(1 << shift)
            .and_then(|offset| offset.checked_add(self.origin))
            .ok_or(overflow("stream position"))?;

        let mut values = T::allocate(region.length());
        let mut cursor = vec![0u64; size.len()];
        let mut offset = 0usize;
        let mut runs = 0usize;
        'read: loop {
            self.input.seek(position)?;
            T::transfer(&mut self.input, &mut values[offset..offset + length])?;
            runs += 1;
            for (counter, (&size, &stride)) in
                std::iter::zip(cursor.iter_mut(), std::iter::zip(size, &strides))
            {
                *counter += 1;
                if *counter < size {
                    position = position
                        .checked_add(stride)
                        .ok_or(overflow("stream position"))?;
                    offset += length;
                    continue 'read;
                }
                *counter = 0;
            }
            break;
        }
        log::trace!(
            "{}: read {} {} elements in {runs} runs of {length}",
            self.input.filename(),
            values.len(),
            self.kind
        );
        Ok(values)
    }

    #[cfg(feature = "ndarray")]
    /// Read the elements of `region` into an [`ndarray::ArrayD`] with the declared (slowest varying first) shape of the region.
    ///
    /// # Errors
    /// Returns a [`DataStoreError`] under the conditions of [`read_elements`](HyperRectangleReader::read_elements), or if
    /// the region shape is not representable as [`usize`].
    pub fn read_ndarray<T: DataTransfer>(
        &mut self,
        region: &Region,
    ) -> Result<ndarray::ArrayD<T>, DataStoreError> {
        let shape = region
            .target_shape()
            .into_iter()
            .map(usize::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| overflow("array shape"))?;
        let values = self.read_elements::<T>(region)?;
        let length = values.len();
        ndarray::ArrayD::<T>::from_shape_vec(shape, values).map_err(|_| {
            DataStoreContentError::new(format!(
                "{} elements do not match the region shape {:?}",
                length,
                region.target_shape()
            ))
            .into()
        })
    }
}

impl HyperRectangleReader<MemoryDataInput> {
    /// Create a new reader of elements of `data_type` stored in `bytes`, from the first byte.
    ///
    /// # Errors
    /// Returns a [`DataStoreError::Content`] if `data_type` cannot be read as primitive elements.
    pub fn from_memory(
        data_type: DataType,
        filename: impl Into<String>,
        bytes: impl Into<Bytes>,
        byte_order: Endianness,
    ) -> Result<Self, DataStoreError> {
        Self::new(
            data_type,
            MemoryDataInput::new(filename, bytes, byte_order),
            0,
        )
    }
}
