//! The file model consumed from a file format decoder.
//!
//! A decoder enumerates [`Variable`]s, [`Dimension`]s and attributes, and groups variables into [`CoordinateSystem`]s.
//! This crate only consumes the traits defined here; decoding the file format is the responsibility of the implementor.
//! [`memory`] implements the traits for files described entirely in memory.

pub mod memory;

use std::sync::Arc;

use derive_more::Display;

use crate::{
    attribute::{AttributeValue, Number, NumberKind},
    data_type::DataType,
};

/// A dimension of a variable or of a coordinate system domain.
///
/// Two dimensions are equal if they have the same name and length.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display)]
#[display("{name}({})", length.map_or_else(|| "?".to_string(), |length| length.to_string()))]
pub struct Dimension {
    name: String,
    length: Option<u64>,
}

impl Dimension {
    /// Create a new dimension with a known `length`.
    #[must_use]
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length: Some(length),
        }
    }

    /// Create a new dimension of unknown length.
    #[must_use]
    pub fn new_unknown_length(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
        }
    }

    /// Return the dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the dimension length, or [`None`] if unknown.
    #[must_use]
    pub const fn length(&self) -> Option<u64> {
        self.length
    }
}

/// An entity bearing attributes: a variable or a group.
pub trait Node: Send + Sync {
    /// Return the name of the node.
    fn name(&self) -> &str;

    /// Return the names of all attributes, in declaration order.
    fn attribute_names(&self) -> Vec<String>;

    /// Return the value of the attribute with the given `name`, or [`None`] if absent.
    fn attribute(&self, name: &str) -> Option<&AttributeValue>;

    /// Return the attribute value as a non-blank string, or [`None`] if absent or not representable as a single string.
    fn attribute_as_string(&self, name: &str) -> Option<String> {
        self.attribute(name).and_then(AttributeValue::to_text)
    }

    /// Return the first numeric value of the attribute, or `NaN` if absent or not numeric.
    fn attribute_as_number(&self, name: &str) -> f64 {
        self.numeric_attribute_values(name)
            .first()
            .map_or(f64::NAN, Number::to_f64)
    }

    /// Return all numeric values of the attribute, or an empty vector if absent or not numeric.
    fn numeric_attribute_values(&self, name: &str) -> Vec<Number> {
        self.attribute(name)
            .map(AttributeValue::numeric_values)
            .unwrap_or_default()
    }

    /// Return the declared number kind of the attribute, or [`None`] if absent or not numeric.
    fn attribute_kind(&self, name: &str) -> Option<NumberKind> {
        self.attribute(name).and_then(AttributeValue::number_kind)
    }
}

/// A variable: an n-dimensional array with attributes.
pub trait Variable: Node {
    /// Return the variable as a [`Node`].
    fn as_node(&self) -> &dyn Node;

    /// Return the dimensions of the variable, in declaration order (the fastest varying dimension last).
    fn dimensions(&self) -> &[Dimension];

    /// Return the data type of the stored values.
    fn data_type(&self) -> DataType;

    /// Return true if the decoder flagged this variable as a coordinate system axis.
    fn is_coordinate_system_axis(&self) -> bool;

    /// Return the unit of measurement, from the `units` attribute.
    fn unit(&self) -> Option<String> {
        self.attribute_as_string("units")
    }
}

/// The physical type of a coordinate axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
#[non_exhaustive]
pub enum AxisType {
    /// Easting in a projected coordinate reference system.
    GeoX,
    /// Northing in a projected coordinate reference system.
    GeoY,
    /// A vertical coordinate of unspecified nature.
    GeoZ,
    /// Geodetic longitude.
    Lon,
    /// Geodetic latitude.
    Lat,
    /// A pressure level.
    Pressure,
    /// A height above a surface.
    Height,
    /// The run time of a forecast.
    RunTime,
    /// Time.
    Time,
    /// Spherical longitude.
    RadialAzimuth,
    /// Spherical latitude.
    RadialElevation,
    /// Geocentric radius.
    RadialDistance,
    /// An ensemble member index.
    Ensemble,
    /// A spectral band.
    Spectral,
}

/// The direction of increasing values of a vertical axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum AxisPositive {
    /// Values increase upward.
    #[display("up")]
    Up,
    /// Values increase downward.
    #[display("down")]
    Down,
}

/// A coordinate axis of a [`CoordinateSystem`].
pub trait CoordinateAxis: Send + Sync {
    /// Return the name of the variable holding the axis coordinates.
    fn name(&self) -> &str;

    /// Return the physical type of the axis, or [`None`] if unknown.
    fn axis_type(&self) -> Option<AxisType>;

    /// Return the direction of increasing values, or [`None`] if unspecified.
    fn positive(&self) -> Option<AxisPositive>;

    /// Return the grid dimensions that the axis coordinate values depend on.
    ///
    /// There is exactly one such dimension in straightforward files, two for a localization grid.
    fn dimensions(&self) -> &[Dimension];
}

/// A coordinate system: a domain of grid dimensions and a range of coordinate axes.
pub trait CoordinateSystem: Send + Sync {
    /// Return the name of the coordinate system.
    fn name(&self) -> &str;

    /// Return the dimensions of the grid, in declaration order (the fastest varying dimension last).
    fn domain(&self) -> &[Dimension];

    /// Return the coordinate axes.
    fn coordinate_axes(&self) -> &[Arc<dyn CoordinateAxis>];

    /// Return the number of grid dimensions.
    fn rank_domain(&self) -> usize {
        self.domain().len()
    }

    /// Return the number of coordinate reference system dimensions.
    fn rank_range(&self) -> usize {
        self.coordinate_axes().len()
    }
}

/// A decoder of a self-describing file.
pub trait Decoder: Send + Sync {
    /// Return a file identifier, for diagnostics.
    fn filename(&self) -> &str;

    /// Return the names of the groups where global attributes are searched, in precedence order.
    ///
    /// [`None`] stands for the root group.
    fn search_path(&self) -> Vec<Option<String>>;

    /// Set the names of the groups where global attributes are searched, in precedence order.
    fn set_search_path(&mut self, search_path: &[Option<String>]);

    /// Return the value of the global attribute with the given `name`, searching the groups of the [search path](Self::search_path).
    fn global_attribute(&self, name: &str) -> Option<&AttributeValue>;

    /// Return the global attribute value as a non-blank string.
    fn string_value(&self, name: &str) -> Option<String> {
        self.global_attribute(name).and_then(AttributeValue::to_text)
    }

    /// Return all variables.
    fn variables(&self) -> Vec<Arc<dyn Variable>>;

    /// Return the variable with the given `name`.
    ///
    /// # Errors
    /// Returns an [`std::io::Error`] if reading the variable header required I/O which failed.
    fn find_variable(&self, name: &str) -> std::io::Result<Option<Arc<dyn Variable>>> {
        Ok(self
            .variables()
            .into_iter()
            .find(|variable| variable.name() == name))
    }

    /// Return the variable or group with the given `name`.
    fn find_node(&self, name: &str) -> Option<Arc<dyn Node>>;

    /// Return all coordinate systems.
    fn coordinate_systems(&self) -> Vec<Arc<dyn CoordinateSystem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_equality() {
        assert_eq!(Dimension::new("x", 5), Dimension::new("x", 5));
        assert_ne!(Dimension::new("x", 5), Dimension::new("y", 5));
        assert_ne!(Dimension::new("x", 5), Dimension::new_unknown_length("x"));
        assert_eq!(Dimension::new("x", 5).to_string(), "x(5)");
        assert_eq!(Dimension::new_unknown_length("t").to_string(), "t(?)");
    }
}
