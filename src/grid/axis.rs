use std::sync::Arc;

use crate::node::{AxisPositive, AxisType, Node, Variable};

/// Return the one character abbreviation of an axis of type `axis_type`, or [`None`] for other types.
///
/// Pressure is abbreviated as height and run time as time.
#[must_use]
pub const fn abbreviation(axis_type: AxisType) -> Option<char> {
    match axis_type {
        AxisType::GeoX => Some('x'),
        AxisType::GeoY => Some('y'),
        AxisType::GeoZ => Some('z'),
        AxisType::Lon => Some('λ'),
        AxisType::Lat => Some('φ'),
        AxisType::Pressure | AxisType::Height => Some('H'),
        AxisType::RunTime | AxisType::Time => Some('t'),
        AxisType::RadialAzimuth => Some('θ'),
        AxisType::RadialElevation => Some('Ω'),
        AxisType::RadialDistance => Some('r'),
        _ => None,
    }
}

/// An axis of a [`Grid`](super::Grid), with the grid dimensions its coordinate values vary over.
#[derive(Clone)]
pub struct Axis {
    abbreviation: Option<char>,
    positive: Option<AxisPositive>,
    source_dimensions: Vec<usize>,
    source_sizes: Vec<u32>,
    coordinates: Arc<dyn Variable>,
}

impl core::fmt::Debug for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Axis")
            .field("abbreviation", &self.abbreviation)
            .field("positive", &self.positive)
            .field("source_dimensions", &self.source_dimensions)
            .field("source_sizes", &self.source_sizes)
            .field("coordinates", &self.coordinates.name())
            .finish()
    }
}

impl Axis {
    /// Create a new axis.
    ///
    /// Each source is the index of a dimension in the grid domain and the number of cells along it.
    #[must_use]
    pub fn new(
        abbreviation: Option<char>,
        positive: Option<AxisPositive>,
        sources: Vec<(usize, u32)>,
        coordinates: Arc<dyn Variable>,
    ) -> Self {
        let (source_dimensions, source_sizes) = sources.into_iter().unzip();
        Self {
            abbreviation,
            positive,
            source_dimensions,
            source_sizes,
            coordinates,
        }
    }

    /// Return the one character abbreviation of the axis type, or [`None`] if unknown.
    #[must_use]
    pub const fn abbreviation(&self) -> Option<char> {
        self.abbreviation
    }

    /// Return the direction of increasing values, or [`None`] if unspecified.
    #[must_use]
    pub const fn positive(&self) -> Option<AxisPositive> {
        self.positive
    }

    /// Return the indices in the grid domain of the dimensions the coordinate values vary over.
    #[must_use]
    pub fn source_dimensions(&self) -> &[usize] {
        &self.source_dimensions
    }

    /// Return the number of cells along each of the [`source_dimensions`](Axis::source_dimensions).
    ///
    /// A size is zero if the dimension length is unknown.
    #[must_use]
    pub fn source_sizes(&self) -> &[u32] {
        &self.source_sizes
    }

    /// Return the variable holding the coordinate values.
    #[must_use]
    pub fn coordinates(&self) -> &Arc<dyn Variable> {
        &self.coordinates
    }

    /// Return the name of the axis, the name of its coordinate variable.
    #[must_use]
    pub fn name(&self) -> &str {
        self.coordinates.name()
    }
}
