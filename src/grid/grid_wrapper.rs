use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::Mutex;

use crate::{
    error::{ArithmeticOverflowError, DataStoreContentError, DataStoreError},
    node::{CoordinateSystem, Decoder, Dimension, Variable},
};

use super::{abbreviation, Axis, Grid};

/// The domain of a grid in one dimension order, with its memoized axes.
struct GridVariant {
    domain: Vec<Dimension>,
    axes: OnceLock<Arc<[Axis]>>,
}

impl GridVariant {
    fn new(domain: Vec<Dimension>) -> Arc<Self> {
        Arc::new(Self {
            domain,
            axes: OnceLock::new(),
        })
    }
}

/// State shared by all the dimension orders of a coordinate system.
struct GridShared {
    coordinate_system: Arc<dyn CoordinateSystem>,
    reordered: Mutex<HashMap<Vec<Dimension>, Arc<GridVariant>>>,
}

/// A [`Grid`] over a decoder [`CoordinateSystem`].
///
/// The dimensions of a variable may be listed in a different order than the domain of its coordinate system.
/// [`for_variable`](GridWrapper::for_variable) returns a grid with the dimension order of the variable.
/// Grids of the same coordinate system share a cache of the dimension orders encountered, so that the axes of
/// each order are computed once.
///
/// The cache is guarded by a mutex, but concurrent callers should build the grids of a decoder from one thread.
#[derive(Clone)]
pub struct GridWrapper {
    shared: Arc<GridShared>,
    variant: Arc<GridVariant>,
}

impl core::fmt::Debug for GridWrapper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridWrapper")
            .field("name", &self.name())
            .field("domain", &self.variant.domain)
            .finish_non_exhaustive()
    }
}

impl GridWrapper {
    /// Create a new grid over `coordinate_system`, with the dimension order of its domain.
    #[must_use]
    pub fn new(coordinate_system: Arc<dyn CoordinateSystem>) -> Self {
        let variant = GridVariant::new(coordinate_system.domain().to_vec());
        Self {
            shared: Arc::new(GridShared {
                coordinate_system,
                reordered: Mutex::new(HashMap::new()),
            }),
            variant,
        }
    }

    /// Return the coordinate system wrapped by this grid.
    #[must_use]
    pub fn coordinate_system(&self) -> &Arc<dyn CoordinateSystem> {
        &self.shared.coordinate_system
    }

    /// Return the grid dimensions in declaration order.
    ///
    /// These are the dimensions of the coordinate system domain, possibly in a different order.
    #[must_use]
    pub fn domain(&self) -> &[Dimension] {
        &self.variant.domain
    }

    /// Return true if `other` is a view of the same dimension order of the same coordinate system.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.variant, &other.variant)
    }

    /// Return the grid to use for `variable`, one of the `coordinate_systems` of the variable.
    ///
    /// Returns:
    ///  - [`None`] if the coordinate system of this grid is not one of the `coordinate_systems`,
    ///  - this grid if the variable dimensions equal the grid dimensions,
    ///  - a grid with the variable dimension order if the variable has the same dimensions in another order,
    ///  - [`None`] otherwise.
    ///
    /// Reordered grids are cached and shared by all the grids of the coordinate system.
    #[must_use]
    pub fn for_variable(
        &self,
        variable: &dyn Variable,
        coordinate_systems: &[Arc<dyn CoordinateSystem>],
    ) -> Option<Self> {
        let coordinate_system = &self.shared.coordinate_system;
        if !coordinate_systems
            .iter()
            .any(|candidate| Arc::ptr_eq(candidate, coordinate_system))
        {
            return None;
        }
        let source = variable.dimensions();
        if self.variant.domain == source {
            return Some(self.clone());
        }
        let mut reordered = self.shared.reordered.lock();
        if let Some(variant) = reordered.get(source) {
            return Some(self.with_variant(Arc::clone(variant)));
        }
        let domain = &self.variant.domain;
        if domain.len() != source.len() || !source.iter().all(|dimension| domain.contains(dimension)) {
            return None;
        }
        let variant = GridVariant::new(source.to_vec());
        reordered.insert(source.to_vec(), Arc::clone(&variant));
        Some(self.with_variant(variant))
    }

    fn with_variant(&self, variant: Arc<GridVariant>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            variant,
        }
    }

    /// Create the axes of the coordinate system, bypassing the cache of [`axes`](Grid::axes).
    ///
    /// Each axis is associated with the index in [`domain`](GridWrapper::domain) of the dimensions its
    /// coordinate values vary over. Axis dimensions absent from the domain are skipped.
    ///
    /// Some coordinate systems list their axes in the order of their domain and others in reverse.
    /// If every axis at index `i` varies over exactly the domain dimension `i`, the axes are kept
    /// in that order. Otherwise they are reversed.
    ///
    /// # Errors
    /// Returns a [`DataStoreError`] if
    ///  - the variable holding the coordinates of an axis can not be read or is missing, or
    ///  - the length of an axis dimension exceeds [`u32::MAX`].
    pub fn create_axes(&self, decoder: &dyn Decoder) -> Result<Vec<Axis>, DataStoreError> {
        let domain = &self.variant.domain;
        let range = self.shared.coordinate_system.coordinate_axes();
        let mut axes = Vec::with_capacity(range.len());
        for axis in range.iter().rev() {
            let mut sources = Vec::with_capacity(axis.dimensions().len());
            for dimension in axis.dimensions() {
                let Some(index) = domain.iter().rposition(|d| d == dimension) else {
                    log::warn!(
                        "{}: dimension {dimension} of axis {} is not in the grid domain",
                        self.name(),
                        axis.name()
                    );
                    continue;
                };
                let size = u32::try_from(dimension.length().unwrap_or(0))
                    .map_err(|_| ArithmeticOverflowError::new("axis size"))?;
                sources.push((index, size));
            }
            let coordinates = decoder.find_variable(axis.name())?.ok_or_else(|| {
                DataStoreContentError::new(format!(
                    "{}: variable {} of axis not found",
                    decoder.filename(),
                    axis.name()
                ))
            })?;
            axes.push(Axis::new(
                axis.axis_type().and_then(abbreviation),
                axis.positive(),
                sources,
                coordinates,
            ));
        }
        axes.reverse();

        let domain_order = range
            .iter()
            .zip(domain)
            .all(|(axis, dimension)| matches!(axis.dimensions(), [d] if d == dimension));
        if domain_order {
            log::debug!("{}: axes kept in domain order", self.name());
        } else {
            log::debug!("{}: axes reversed", self.name());
            axes.reverse();
        }
        Ok(axes)
    }
}

impl Grid for GridWrapper {
    fn name(&self) -> &str {
        self.shared.coordinate_system.name()
    }

    fn source_dimensions(&self) -> usize {
        self.shared.coordinate_system.rank_domain()
    }

    fn target_dimensions(&self) -> usize {
        self.shared.coordinate_system.rank_range()
    }

    fn shape(&self) -> Option<Vec<u64>> {
        self.variant
            .domain
            .iter()
            .rev()
            .map(|dimension| dimension.length().filter(|&length| length > 0))
            .collect()
    }

    fn axes(&self, decoder: &dyn Decoder) -> Result<Arc<[Axis]>, DataStoreError> {
        if let Some(axes) = self.variant.axes.get() {
            return Ok(Arc::clone(axes));
        }
        let axes: Arc<[Axis]> = self.create_axes(decoder)?.into();
        Ok(Arc::clone(self.variant.axes.get_or_init(|| axes)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        data_type::DataType,
        node::{
            memory::{MemoryCoordinateAxis, MemoryCoordinateSystem, MemoryDecoder, MemoryVariable},
            AxisType, CoordinateAxis,
        },
    };

    use super::*;

    fn coordinate_system(
        axes: Vec<(&str, AxisType, Dimension)>,
        domain: Vec<Dimension>,
    ) -> Arc<dyn CoordinateSystem> {
        let axes = axes
            .into_iter()
            .map(|(name, axis_type, dimension)| {
                Arc::new(MemoryCoordinateAxis::new(name, Some(axis_type), vec![dimension]))
                    as Arc<dyn CoordinateAxis>
            })
            .collect();
        Arc::new(MemoryCoordinateSystem::new("cs", domain, axes))
    }

    #[test]
    fn grid_wrapper_shape() {
        let y = Dimension::new("y", 4);
        let x = Dimension::new("x", 5);
        let cs = coordinate_system(vec![], vec![y, x.clone()]);
        let grid = GridWrapper::new(cs);
        assert_eq!(grid.shape(), Some(vec![5, 4]));
        assert_eq!(grid.source_dimensions(), 2);
        assert_eq!(grid.target_dimensions(), 0);

        let cs = coordinate_system(vec![], vec![Dimension::new_unknown_length("t"), x.clone()]);
        assert_eq!(GridWrapper::new(cs).shape(), None);
        let cs = coordinate_system(vec![], vec![Dimension::new("t", 0), x]);
        assert_eq!(GridWrapper::new(cs).shape(), None);
    }

    #[test]
    fn grid_wrapper_axes_missing_variable() {
        let x = Dimension::new("x", 5);
        let cs = coordinate_system(vec![("lon", AxisType::Lon, x.clone())], vec![x]);
        let grid = GridWrapper::new(cs);
        let decoder = MemoryDecoder::new("test.nc");
        assert!(matches!(grid.axes(&decoder), Err(DataStoreError::Content(_))));
        let decoder = decoder.with_variable(MemoryVariable::new(
            "lon",
            DataType::Double,
            vec![Dimension::new("x", 5)],
        ));
        let axes = grid.axes(&decoder).unwrap();
        assert_eq!(axes.len(), 1);
        assert_eq!(axes[0].abbreviation(), Some('λ'));
        assert_eq!(axes[0].source_dimensions(), &[0]);
        assert_eq!(axes[0].source_sizes(), &[5]);
        assert!(Arc::ptr_eq(&axes, &grid.axes(&decoder).unwrap()));
    }

    #[test]
    fn grid_wrapper_axis_dimension_not_in_domain() {
        let x = Dimension::new("x", 5);
        let cs = coordinate_system(
            vec![("lon", AxisType::Lon, Dimension::new("i", 3))],
            vec![x.clone()],
        );
        let decoder = MemoryDecoder::new("test.nc")
            .with_variable(MemoryVariable::new("lon", DataType::Double, vec![x]));
        let axes = GridWrapper::new(cs).create_axes(&decoder).unwrap();
        assert!(axes[0].source_dimensions().is_empty());
        assert!(axes[0].source_sizes().is_empty());
    }
}
