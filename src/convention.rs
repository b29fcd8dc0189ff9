//! Conventions: policies resolving the implicit metadata of a file.
//!
//! A [`Convention`] interprets the attributes of a file on top of the [CF conventions](https://cfconventions.org/):
//! valid ranges, no-data values, transfer functions, variable roles and map projection parameters.
//! Producers which deviate from the CF conventions are supported by a [`Convention`] overriding some of the default methods.
//!
//! Conventions are stateless and shared between threads.
//! The convention applicable to a file is selected once with [`find`], from the conventions registered
//!  - at compile time with [inventory], by submitting a [`ConventionPlugin`]:
//!    `inventory::submit! { ConventionPlugin::new("ghrsst", create_ghrsst_convention) }`, or
//!  - at run time with [`register_convention`].
//!
//! ```rust
//! # use std::sync::Arc;
//! # use ncgrid::{convention::{self, Convention}, node::{Decoder, memory::MemoryDecoder}};
//! struct GhrsstConvention;
//!
//! impl Convention for GhrsstConvention {
//!     fn identifier(&self) -> &'static str {
//!         "ghrsst"
//!     }
//!
//!     fn is_applicable_to(&self, decoder: &dyn Decoder) -> bool {
//!         decoder.string_value("project").is_some_and(|p| p.contains("GHRSST"))
//!     }
//! }
//!
//! convention::register_convention(Arc::new(GhrsstConvention));
//! let decoder = MemoryDecoder::new("sst.nc")
//!     .with_global_attribute("project", "Group for High Resolution Sea Surface Temperature (GHRSST)");
//! assert_eq!(convention::find(&decoder).identifier(), "ghrsst");
//! assert_eq!(convention::find(&MemoryDecoder::new("other.nc")).identifier(), "cf");
//! ```

mod nodata;
mod projection;
mod range;
mod transfer_function;

pub use nodata::{NodataRole, NodataValues, NODATA_ATTRIBUTES};
pub use projection::{
    BursaWolfParameters, ProjectionParameters, ProjectionValue, BASE_CRS, GRID_MAPPING,
    GRID_MAPPING_NAME, WGS84_DATUM,
};
pub use range::{NumberRange, ValidRange, ADD_OFFSET, RANGE_ATTRIBUTES, SCALE_FACTOR};
pub use transfer_function::TransferFunction;

use std::{
    borrow::Cow,
    sync::{Arc, OnceLock},
};

use derive_more::Display;
use parking_lot::Mutex;

use crate::{
    grid::{MIN_DIMENSION, MIN_SPAN},
    node::{Decoder, Node, Variable},
    plugin::Plugin,
    referencing::{Linearizer, MathTransform, ProjectedCrs, TransformError},
};

/// The groups where global attributes are searched by default, in precedence order. [`None`] is the root group.
pub const SEARCH_PATH: [Option<&str>; 4] = [
    Some("NCISOMetadata"),
    Some("CFMetadata"),
    None,
    Some("THREDDSMetadata"),
];

/// The role of a variable in a file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum VariableRole {
    /// The coordinate values of a coordinate system axis.
    #[display("axis")]
    Axis,
    /// The sample values of a raster.
    #[display("coverage")]
    Coverage,
    /// Any other variable.
    #[display("other")]
    Other,
}

/// A policy resolving the implicit metadata of a file.
///
/// All methods have a default implementation following the CF conventions.
/// Implementations override the methods where a producer deviates from them.
pub trait Convention: Send + Sync {
    /// Return a unique identifier of the convention, for diagnostics.
    fn identifier(&self) -> &'static str;

    /// Return true if this convention applies to the file read by `decoder`.
    ///
    /// This method must not change the state of `decoder`. The default implementation returns false.
    fn is_applicable_to(&self, decoder: &dyn Decoder) -> bool {
        let _ = decoder;
        false
    }

    /// Return the names of the groups where global attributes are searched, in precedence order.
    ///
    /// [`None`] stands for the root group. The default implementation returns the [`SEARCH_PATH`].
    fn search_path(&self) -> Vec<Option<String>> {
        SEARCH_PATH.iter().map(|group| group.map(str::to_string)).collect()
    }

    /// Return the name of the attribute holding the value of the standard attribute `name`.
    ///
    /// The default implementation returns `name` unchanged.
    fn map_attribute_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    /// Return the role of `variable`.
    ///
    /// The default implementation returns
    ///  - [`VariableRole::Axis`] if the decoder flagged the variable as a coordinate system axis, else
    ///  - [`VariableRole::Coverage`] if the variable has at least [`MIN_DIMENSION`] dimensions of length
    ///    [`MIN_SPAN`] or more and its data type is supported by rasters, else
    ///  - [`VariableRole::Other`].
    fn role_of(&self, variable: &dyn Variable) -> VariableRole {
        if variable.is_coordinate_system_axis() {
            return VariableRole::Axis;
        }
        let vectors = variable
            .dimensions()
            .iter()
            .filter(|dimension| dimension.length().is_some_and(|length| length >= MIN_SPAN))
            .count();
        if vectors >= MIN_DIMENSION && variable.data_type().is_raster_compatible() {
            VariableRole::Coverage
        } else {
            VariableRole::Other
        }
    }

    /// Return the names of the variables holding the coordinates of each dimension of `variable`, if they can not be
    /// found from the attributes of the variable.
    ///
    /// The default implementation returns [`None`].
    fn names_of_axis_variables(&self, variable: &dyn Variable) -> Option<Vec<String>> {
        let _ = variable;
        None
    }

    /// Return the name of the dimension at `index` of a variable, allowing a localization grid with a resolution
    /// different from the data grid to be mapped by name.
    ///
    /// The default implementation returns the value of the `dim<index>` attribute.
    fn name_of_dimension(&self, variable: &dyn Variable, index: usize) -> Option<String> {
        variable.attribute_as_string(&format!("dim{index}"))
    }

    /// Return the factor converting grid indices of the localization grid `axis` to indices of the data grid, or `NaN`.
    ///
    /// The default implementation returns the value of the `resampling_interval` attribute.
    fn grid_to_data_indices(&self, axis: &dyn Variable) -> f64 {
        axis.attribute_as_number("resampling_interval")
    }

    /// Return the range of valid values of `variable`, or [`None`] if no range is declared.
    ///
    /// The default implementation reads the [`RANGE_ATTRIBUTES`] in precedence order and stops at the first attribute
    /// completing both bounds. The range is packed unless its number kind is at least as wide as the data type of the
    /// variable and as the kinds of its [`SCALE_FACTOR`] and [`ADD_OFFSET`] attributes.
    fn valid_range(&self, variable: &dyn Variable) -> Option<ValidRange> {
        range::valid_range_of(variable)
    }

    /// Return the no-data values of `variable` and their roles, in insertion order.
    ///
    /// The default implementation merges the values of the [`NODATA_ATTRIBUTES`]:
    /// bit 0 of the mask is set for `_FillValue` and bit 1 for `missing_value`.
    fn nodata_values(&self, variable: &dyn Variable) -> NodataValues {
        nodata::nodata_values_of(variable)
    }

    /// Return the function converting the packed values of `variable` to measurements.
    ///
    /// The default implementation reads the [`SCALE_FACTOR`] and [`ADD_OFFSET`] attributes, each defaulting to the identity.
    fn transfer_function(&self, variable: &dyn Variable) -> TransferFunction {
        transfer_function::transfer_function_of(variable)
    }

    /// Return candidate transforms applied to localization grids before a linear fit.
    ///
    /// The default implementation returns no candidate.
    fn linearizers(&self, decoder: &dyn Decoder) -> Vec<Arc<dyn Linearizer>> {
        let _ = decoder;
        Vec::new()
    }

    /// Return the names of the nodes to probe for the map projection of `variable`.
    ///
    /// The default implementation returns the value of the [`GRID_MAPPING`] attribute, if any.
    fn grid_mapping(&self, variable: &dyn Variable) -> Vec<String> {
        variable
            .attribute_as_string(GRID_MAPPING)
            .into_iter()
            .collect()
    }

    /// Return the map projection parameters held by `node`, or [`None`] if `node` has no [`GRID_MAPPING_NAME`] attribute.
    ///
    /// The default implementation collects the attributes of `node`, in declaration order:
    ///  - `grid_mapping_name` is always stored as text,
    ///  - attributes with a name ending in `_name` are handled according to the
    ///    [projection name attributes](crate::config::Config#projection-name-attributes) configuration,
    ///  - `towgs84` with at least 3 values is stored as [`BursaWolfParameters`] to the [`WGS84_DATUM`],
    ///  - `crs_wkt` is ignored,
    ///  - other attributes are stored as a number or a vector of numbers, non-numeric attributes are ignored.
    ///
    /// Duplicated parameters are logged and the first occurrence is kept.
    fn projection(&self, node: &dyn Node) -> Option<ProjectionParameters> {
        projection::projection_of(node)
    }

    /// Return the transform from grid indices to the base geographic coordinates of `crs`, if `node` declares it.
    ///
    /// The default implementation returns [`None`].
    ///
    /// # Errors
    /// Returns a [`TransformError`] if the transform declared by `node` can not be built.
    fn grid_to_crs(
        &self,
        node: &dyn Node,
        crs: &dyn ProjectedCrs,
    ) -> Result<Option<Arc<dyn MathTransform>>, TransformError> {
        let _ = (node, crs);
        Ok(None)
    }
}

/// The default convention, following the CF conventions.
#[derive(Copy, Clone, Debug, Default)]
pub struct CfConvention;

impl Convention for CfConvention {
    fn identifier(&self) -> &'static str {
        "cf"
    }
}

/// A convention plugin.
pub type ConventionPlugin = Plugin<Arc<dyn Convention>>;
inventory::collect!(ConventionPlugin);

static AVAILABLE: OnceLock<Mutex<Vec<Arc<dyn Convention>>>> = OnceLock::new();

fn available() -> &'static Mutex<Vec<Arc<dyn Convention>>> {
    AVAILABLE.get_or_init(|| {
        Mutex::new(
            inventory::iter::<ConventionPlugin>
                .into_iter()
                .map(Plugin::create)
                .collect(),
        )
    })
}

/// Return the default convention, a shared [`CfConvention`].
#[must_use]
pub fn default_convention() -> Arc<dyn Convention> {
    static DEFAULT: OnceLock<Arc<dyn Convention>> = OnceLock::new();
    DEFAULT.get_or_init(|| Arc::new(CfConvention)).clone()
}

/// Register `convention` after the conventions already registered.
pub fn register_convention(convention: Arc<dyn Convention>) {
    available().lock().push(convention);
}

/// Return the registered conventions, in registration order.
#[must_use]
pub fn registered_conventions() -> Vec<Arc<dyn Convention>> {
    available().lock().clone()
}

/// Find the convention applicable to the file read by `decoder`.
///
/// Return the first registered convention [applicable](Convention::is_applicable_to) to `decoder`, or the
/// [default convention](default_convention) if none applies.
/// The registry is locked only while fetching each candidate, so applicability tests may read the file or call [`find`].
#[must_use]
pub fn find(decoder: &dyn Decoder) -> Arc<dyn Convention> {
    let mut index = 0;
    loop {
        let Some(candidate) = available().lock().get(index).cloned() else {
            break;
        };
        if candidate.is_applicable_to(decoder) {
            log::debug!(
                "{}: using the {} convention",
                decoder.filename(),
                candidate.identifier()
            );
            return candidate;
        }
        index += 1;
    }
    let convention = default_convention();
    log::debug!(
        "{}: using the default {} convention",
        decoder.filename(),
        convention.identifier()
    );
    convention
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attribute::{Number, NumberKind},
        data_type::DataType,
        node::{memory::MemoryVariable, Dimension},
    };

    fn grid_variable(data_type: DataType) -> MemoryVariable {
        MemoryVariable::new(
            "T",
            data_type,
            vec![Dimension::new("y", 4), Dimension::new("x", 5)],
        )
    }

    #[test]
    fn convention_role_of() {
        let convention = CfConvention;
        assert_eq!(
            convention.role_of(&grid_variable(DataType::Short)),
            VariableRole::Coverage
        );
        assert_eq!(
            convention.role_of(&grid_variable(DataType::Char)),
            VariableRole::Other
        );
        assert_eq!(
            convention.role_of(&grid_variable(DataType::Float).with_coordinate_system_axis(true)),
            VariableRole::Axis
        );
        let profile = MemoryVariable::new(
            "T",
            DataType::Float,
            vec![Dimension::new("time", 1), Dimension::new("z", 10)],
        );
        assert_eq!(convention.role_of(&profile), VariableRole::Other);
        let unknown = MemoryVariable::new(
            "T",
            DataType::Float,
            vec![
                Dimension::new_unknown_length("time"),
                Dimension::new("x", 10),
            ],
        );
        assert_eq!(convention.role_of(&unknown), VariableRole::Other);
    }

    #[test]
    fn convention_defaults() {
        let convention = CfConvention;
        let variable = grid_variable(DataType::Float)
            .with_attribute("dim1", "ni")
            .with_attribute("resampling_interval", 4.0f32)
            .with_attribute(GRID_MAPPING, "crs");
        assert_eq!(convention.identifier(), "cf");
        assert_eq!(convention.map_attribute_name("title"), "title");
        assert_eq!(convention.name_of_dimension(&variable, 1).as_deref(), Some("ni"));
        assert_eq!(convention.name_of_dimension(&variable, 0), None);
        assert_eq!(convention.grid_to_data_indices(&variable), 4.0);
        assert!(convention.grid_to_data_indices(&grid_variable(DataType::Float)).is_nan());
        assert_eq!(convention.names_of_axis_variables(&variable), None);
        assert_eq!(convention.grid_mapping(&variable), vec!["crs"]);
        assert!(convention.grid_mapping(&grid_variable(DataType::Float)).is_empty());
        assert_eq!(
            convention.search_path(),
            vec![
                Some("NCISOMetadata".to_string()),
                Some("CFMetadata".to_string()),
                None,
                Some("THREDDSMetadata".to_string())
            ]
        );
    }

    #[test]
    fn convention_valid_range_measurement() {
        let variable = grid_variable(DataType::Short)
            .with_attribute("valid_range", vec![-2.5f32, 40.0])
            .with_attribute("scale_factor", 0.01f32)
            .with_attribute("units", "degC");
        let range = CfConvention.valid_range(&variable).unwrap();
        assert_eq!(
            range,
            ValidRange::Measurement {
                range: NumberRange::new(NumberKind::Float, Number::Float(-2.5), Number::Float(40.0)),
                unit: Some("degC".to_string()),
            }
        );
        // a double offset is wider than the float range
        let variable = variable.with_attribute("add_offset", 273.15f64);
        assert!(CfConvention.valid_range(&variable).unwrap().is_packed());
    }

    #[test]
    fn convention_transfer_function() {
        let variable = grid_variable(DataType::Short).with_attribute("add_offset", 10i16);
        let function = CfConvention.transfer_function(&variable);
        assert_eq!(function.scale(), 1.0);
        assert_eq!(function.offset(), 10.0);
        assert_eq!(
            CfConvention.transfer_function(&grid_variable(DataType::Int)),
            TransferFunction::default()
        );
    }
}
