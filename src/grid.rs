//! Grid geometries. Includes a [`GridWrapper`] over a decoder [`CoordinateSystem`](crate::node::CoordinateSystem).
//!
//! A [`Grid`] relates the dimensions of a variable (the grid, or source, dimensions) to the axes of a coordinate
//! reference system (the target dimensions). Each target dimension is described by an [`Axis`].
//!
//! Shapes returned by a grid are in natural order: the fastest varying dimension first.
//! This is the reverse of the declaration order of [`Variable::dimensions`](crate::node::Variable::dimensions),
//! and the order taken by [`Region::new`](crate::io::Region::new).

mod axis;
mod grid_wrapper;

pub use axis::{abbreviation, Axis};
pub use grid_wrapper::GridWrapper;

use std::sync::Arc;

use crate::{error::DataStoreError, node::Decoder};

/// The minimum number of dimensions of [`MIN_SPAN`] or more cells for a variable to be a coverage.
pub const MIN_DIMENSION: usize = 2;

/// The minimum number of cells along a dimension for the dimension to count toward [`MIN_DIMENSION`].
pub const MIN_SPAN: u64 = 2;

/// Grid traits.
pub trait Grid: Send + Sync {
    /// Return a name for information purpose only.
    fn name(&self) -> &str;

    /// Return the number of source dimensions of the grid to CRS conversion, the dimensionality of the grid.
    fn source_dimensions(&self) -> usize;

    /// Return the number of target dimensions of the grid to CRS conversion, the dimensionality of the CRS.
    ///
    /// This should be the number of [`axes`](Grid::axes), but callers should tolerate inconsistencies.
    fn target_dimensions(&self) -> usize;

    /// Return the number of cells along each source dimension in natural order (fastest varying first).
    ///
    /// Returns [`None`] if the length of a dimension is zero or unknown.
    fn shape(&self) -> Option<Vec<u64>>;

    /// Return the axes of the grid, one per target dimension.
    ///
    /// # Errors
    /// Returns a [`DataStoreError`] if the variable holding axis coordinates can not be read or is missing,
    /// or if an axis size overflows.
    fn axes(&self, decoder: &dyn Decoder) -> Result<Arc<[Axis]>, DataStoreError>;
}
