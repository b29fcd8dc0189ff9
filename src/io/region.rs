use itertools::izip;
use thiserror::Error;

use crate::error::{ArithmeticOverflowError, DataStoreContentError, DataStoreError};

/// A rectangular sub-selection of a variable, with optional subsampling.
///
/// Dimensions are in natural order: dimension 0 is the fastest varying one, as in [`Grid::shape`](crate::grid::Grid::shape).
/// This is the reverse of the declaration order of netCDF `(..., y, x)` variables,
/// see [`Region::from_row_major`] to build a region from the declaration order.
///
/// A region derives the parameters used by a [`HyperRectangleReader`](super::HyperRectangleReader):
///  - the offset of the first element in the flattened variable ([`start_at`](Region::start_at)),
///  - the number of elements to skip after reading the last element of each dimension ([`skip`](Region::skip)),
///  - the number of leading dimensions which can be read as one contiguous run ([`contiguous_data_dimension`](Region::contiguous_data_dimension)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    target_size: Vec<u64>,
    skips: Vec<u64>,
    start_at: u64,
    length: usize,
}

/// A region error.
#[derive(Clone, Debug, Error)]
pub enum RegionError {
    /// The arguments do not all have the same number of dimensions.
    #[error("incompatible dimensionality {_0}, expected {_1}")]
    IncompatibleDimensionality(usize, usize),
    /// The upper bound of a dimension is beyond the size of the variable.
    #[error("range {lower}..{upper} of dimension {dimension} is out of bounds 0..{size}")]
    #[allow(missing_docs)]
    OutOfBounds {
        dimension: usize,
        lower: u64,
        upper: u64,
        size: u64,
    },
    /// The range of a dimension is empty.
    #[error("range {lower}..{upper} of dimension {dimension} is empty")]
    #[allow(missing_docs)]
    EmptyRange {
        dimension: usize,
        lower: u64,
        upper: u64,
    },
    /// The subsampling of a dimension is zero.
    #[error("subsampling of dimension {_0} is zero")]
    ZeroSubsampling(usize),
    /// An offset or element count is not representable.
    #[error(transparent)]
    Overflow(#[from] ArithmeticOverflowError),
}

impl From<RegionError> for DataStoreError {
    fn from(error: RegionError) -> Self {
        match error {
            RegionError::Overflow(error) => Self::Overflow(error),
            error => Self::Content(DataStoreContentError::new(error.to_string())),
        }
    }
}

fn overflow(quantity: &'static str) -> ArithmeticOverflowError {
    ArithmeticOverflowError::new(quantity)
}

impl Region {
    /// Create a new region in natural order (dimension 0 is the fastest varying one).
    ///
    /// For each dimension `d`, the elements `lower[d]`, `lower[d] + subsampling[d]`, ... below `upper[d]` (exclusive) are selected
    /// from a variable dimension of length `size[d]`.
    ///
    /// # Errors
    /// Returns a [`RegionError`] if
    ///  - the arguments do not have the same length,
    ///  - a range is empty or not within `0..size[d]`,
    ///  - a subsampling is zero, or
    ///  - the offsets of the region within the variable are not representable as [`u64`].
    pub fn new(
        size: &[u64],
        lower: &[u64],
        upper: &[u64],
        subsampling: &[u64],
    ) -> Result<Self, RegionError> {
        let dimensionality = size.len();
        for length in [lower.len(), upper.len(), subsampling.len()] {
            if length != dimensionality {
                return Err(RegionError::IncompatibleDimensionality(
                    length,
                    dimensionality,
                ));
            }
        }

        let mut target_size = Vec::with_capacity(dimensionality);
        let mut skips = Vec::with_capacity(dimensionality);
        let mut start_at: u64 = 0;
        let mut length: u64 = 1;
        let mut stride: u64 = 1;
        // Elements between the first and the last element read in the faster dimensions.
        let mut span: u64 = 0;
        for (dimension, (&size, &lower, &upper, &step)) in
            izip!(size, lower, upper, subsampling).enumerate()
        {
            if upper > size {
                return Err(RegionError::OutOfBounds {
                    dimension,
                    lower,
                    upper,
                    size,
                });
            }
            if lower >= upper {
                return Err(RegionError::EmptyRange {
                    dimension,
                    lower,
                    upper,
                });
            }
            if step == 0 {
                return Err(RegionError::ZeroSubsampling(dimension));
            }
            let count = (upper - lower).div_ceil(step);
            let step_elements = step.checked_mul(stride).ok_or(overflow("region stride"))?;
            // span < stride <= step_elements, so this never underflows
            skips.push(step_elements - span - 1);
            span = (count - 1)
                .checked_mul(step_elements)
                .and_then(|s| s.checked_add(span))
                .ok_or(overflow("region span"))?;
            start_at = lower
                .checked_mul(stride)
                .and_then(|offset| offset.checked_add(start_at))
                .ok_or(overflow("region start offset"))?;
            length = length.checked_mul(count).ok_or(overflow("region length"))?;
            target_size.push(count);
            stride = stride.checked_mul(size).ok_or(overflow("variable length"))?;
        }
        let length = usize::try_from(length).map_err(|_| overflow("region length"))?;
        Ok(Self {
            target_size,
            skips,
            start_at,
            length,
        })
    }

    /// Create a new region in declaration order (the last dimension is the fastest varying one).
    ///
    /// `start` is the index of the first element, `extent` is the number of elements covered by the region before subsampling.
    ///
    /// # Errors
    /// Returns a [`RegionError`] under the conditions of [`Region::new`], or if `start + extent` overflows.
    pub fn from_row_major(
        shape: &[u64],
        start: &[u64],
        extent: &[u64],
        subsampling: &[u64],
    ) -> Result<Self, RegionError> {
        if start.len() != extent.len() {
            return Err(RegionError::IncompatibleDimensionality(
                extent.len(),
                start.len(),
            ));
        }
        let upper = std::iter::zip(start, extent)
            .map(|(start, extent)| start.checked_add(*extent))
            .collect::<Option<Vec<_>>>()
            .ok_or(overflow("region upper bound"))?;
        let reversed = |values: &[u64]| values.iter().rev().copied().collect::<Vec<_>>();
        Self::new(
            &reversed(shape),
            &reversed(start),
            &reversed(&upper),
            &reversed(subsampling),
        )
    }

    /// Return the number of dimensions.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.target_size.len()
    }

    /// Return the number of elements selected in each dimension, in natural order.
    #[must_use]
    pub fn target_size(&self) -> &[u64] {
        &self.target_size
    }

    /// Return the number of elements selected in each dimension, in declaration order.
    #[must_use]
    pub fn target_shape(&self) -> Vec<u64> {
        self.target_size.iter().rev().copied().collect()
    }

    /// Return the total number of selected elements.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Return the offset of the first selected element of the flattened variable, in elements.
    #[must_use]
    pub fn start_at(&self) -> u64 {
        self.start_at
    }

    /// Return the number of elements to skip after the last element read along `dimension`.
    ///
    /// # Panics
    /// Panics if `dimension` is not less than the [dimensionality](Region::dimensionality).
    #[must_use]
    pub fn skip(&self, dimension: usize) -> u64 {
        self.skips[dimension]
    }

    /// Return the number of leading dimensions which are read with back-to-back elements.
    ///
    /// The elements of those dimensions form one contiguous run which can be read without seeking.
    #[must_use]
    pub fn contiguous_data_dimension(&self) -> usize {
        self.skips.iter().take_while(|&&skip| skip == 0).count()
    }

    /// Return the number of elements in one contiguous run.
    #[must_use]
    pub fn contiguous_data_length(&self) -> u64 {
        self.target_size[..self.contiguous_data_dimension()]
            .iter()
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_sub_block() {
        // declared shape (4, 5), rows 1..3, columns 2..5
        let region = Region::new(&[5, 4], &[2, 1], &[5, 3], &[1, 1]).unwrap();
        assert_eq!(region.target_size(), &[3, 2]);
        assert_eq!(region.target_shape(), vec![2, 3]);
        assert_eq!(region.length(), 6);
        assert_eq!(region.start_at(), 7);
        assert_eq!(region.skip(0), 0);
        assert_eq!(region.skip(1), 2);
        assert_eq!(region.contiguous_data_dimension(), 1);
        assert_eq!(region.contiguous_data_length(), 3);
        assert_eq!(
            region,
            Region::from_row_major(&[4, 5], &[1, 2], &[2, 3], &[1, 1]).unwrap()
        );
    }

    #[test]
    fn region_full() {
        let region = Region::new(&[5, 4, 3], &[0, 0, 0], &[5, 4, 3], &[1, 1, 1]).unwrap();
        assert_eq!(region.contiguous_data_dimension(), 3);
        assert_eq!(region.contiguous_data_length(), 60);
        assert_eq!(region.start_at(), 0);
        assert_eq!(region.length(), 60);
    }

    #[test]
    fn region_full_rows() {
        // whole rows contiguous, a band of rows of the middle dimension
        let region = Region::new(&[5, 4, 3], &[0, 1, 0], &[5, 3, 3], &[1, 1, 1]).unwrap();
        assert_eq!(region.contiguous_data_dimension(), 2);
        assert_eq!(region.contiguous_data_length(), 10);
        assert_eq!(region.skip(2), 10);
        assert_eq!(region.start_at(), 5);
    }

    #[test]
    fn region_subsampling() {
        let region = Region::new(&[10, 3], &[1, 0], &[10, 3], &[3, 2]).unwrap();
        assert_eq!(region.target_size(), &[3, 2]);
        assert_eq!(region.skip(0), 2);
        // last element read in a row is 7, the next row starts at 20 + 1
        assert_eq!(region.skip(1), 13);
        assert_eq!(region.contiguous_data_dimension(), 0);
        assert_eq!(region.contiguous_data_length(), 1);
    }

    #[test]
    fn region_errors() {
        assert!(matches!(
            Region::new(&[5, 4], &[0], &[5, 4], &[1, 1]),
            Err(RegionError::IncompatibleDimensionality(1, 2))
        ));
        assert!(matches!(
            Region::new(&[5], &[5], &[7], &[1]),
            Err(RegionError::OutOfBounds { dimension: 0, .. })
        ));
        assert!(matches!(
            Region::new(&[5], &[3], &[3], &[1]),
            Err(RegionError::EmptyRange { dimension: 0, .. })
        ));
        assert!(matches!(
            Region::new(&[5], &[0], &[5], &[0]),
            Err(RegionError::ZeroSubsampling(0))
        ));
        assert!(matches!(
            Region::new(&[u64::MAX, u64::MAX], &[0, 1], &[1, 2], &[1, 1]),
            Err(RegionError::Overflow(_))
        ));
        let error: DataStoreError = Region::new(&[5], &[6], &[8], &[1]).unwrap_err().into();
        assert!(matches!(error, DataStoreError::Content(_)));
    }
}
