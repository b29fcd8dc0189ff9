use derive_more::{Display, From};

use crate::{
    attribute::Number,
    config::{global_config, ProjectionNameAttributes},
    node::Node,
};

/// The attribute of a variable naming the node which holds its map projection parameters.
pub const GRID_MAPPING: &str = "grid_mapping";

/// The attribute naming the map projection method.
pub const GRID_MAPPING_NAME: &str = "grid_mapping_name";

/// The projection parameter key reserved for the base geographic coordinate reference system.
pub const BASE_CRS: &str = "base_crs";

/// The target datum of the `towgs84` attribute.
pub const WGS84_DATUM: &str = "World Geodetic System 1984";

/// Datum shift parameters to a target datum, as a Bursa-Wolf 3 or 7 parameters transformation.
///
/// Translations are in metres, rotations in arc-seconds and the scale difference in parts per million.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BursaWolfParameters {
    target_datum: String,
    /// X-axis translation.
    pub tx: f64,
    /// Y-axis translation.
    pub ty: f64,
    /// Z-axis translation.
    pub tz: f64,
    /// X-axis rotation.
    pub rx: f64,
    /// Y-axis rotation.
    pub ry: f64,
    /// Z-axis rotation.
    pub rz: f64,
    /// Scale difference.
    pub ds: f64,
}

impl BursaWolfParameters {
    /// Create new parameters to `target_datum` from `values`, in the `tX, tY, tZ, rX, rY, rZ, dS` order.
    ///
    /// Missing values are zero. Returns [`None`] if there are less than 3 or more than 7 values.
    #[must_use]
    pub fn new(target_datum: impl Into<String>, values: &[f64]) -> Option<Self> {
        if !(3..=7).contains(&values.len()) {
            return None;
        }
        let value = |index: usize| values.get(index).copied().unwrap_or(0.0);
        Some(Self {
            target_datum: target_datum.into(),
            tx: value(0),
            ty: value(1),
            tz: value(2),
            rx: value(3),
            ry: value(4),
            rz: value(5),
            ds: value(6),
        })
    }

    /// Return the name of the target datum.
    #[must_use]
    pub fn target_datum(&self) -> &str {
        &self.target_datum
    }

    /// Return true if the parameters are only translations.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_translation(&self) -> bool {
        self.rx == 0.0 && self.ry == 0.0 && self.rz == 0.0 && self.ds == 0.0
    }

    /// Return the parameter values in the `tX, tY, tZ, rX, rY, rZ, dS` order.
    #[must_use]
    pub fn values(&self) -> [f64; 7] {
        [self.tx, self.ty, self.tz, self.rx, self.ry, self.rz, self.ds]
    }
}

/// The value of a map projection parameter.
#[derive(Clone, Debug, PartialEq, Display, From)]
pub enum ProjectionValue {
    /// A text, such as the projection method name.
    #[display("{_0}")]
    Text(String),
    /// A single number, the usual case.
    #[display("{_0}")]
    Number(Number),
    /// A vector of numbers, such as the two standard parallels of a conic projection.
    #[display("{_0:?}")]
    Vector(Vec<f64>),
    /// Datum shift parameters.
    #[display("towgs84{:?}", _0.values())]
    BursaWolf(BursaWolfParameters),
}

impl ProjectionValue {
    /// Return the text, or [`None`] if this value is not a text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Return the numeric value, or [`None`] if this value is not a single number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(number.to_f64()),
            _ => None,
        }
    }
}

/// Map projection parameters, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionParameters(Vec<(String, ProjectionValue)>);

impl ProjectionParameters {
    /// Create empty projection parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the projection method name, the value of the [`GRID_MAPPING_NAME`] parameter.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.get(GRID_MAPPING_NAME).and_then(ProjectionValue::as_text)
    }

    /// Return the value of the parameter `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProjectionValue> {
        self.0
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Insert the parameter `name` if absent.
    ///
    /// Returns false, leaving the existing value as is, if the parameter was already present.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: ProjectionValue) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.0.push((name, value));
        true
    }

    /// Return an iterator over the parameter names and values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProjectionValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Return the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect the map projection parameters of `node`.
///
/// See [`Convention::projection`](super::Convention::projection).
pub(crate) fn projection_of(node: &dyn Node) -> Option<ProjectionParameters> {
    let method = node.attribute_as_string(GRID_MAPPING_NAME)?;
    let handling = global_config().projection_name_attributes();
    let mut definition = ProjectionParameters::new();
    definition.insert_if_absent(GRID_MAPPING_NAME, ProjectionValue::Text(method));
    for name in node.attribute_names() {
        let lower_name = name.to_lowercase();
        let value = if lower_name.ends_with("_name") {
            if handling == ProjectionNameAttributes::Store && lower_name == GRID_MAPPING_NAME {
                continue;
            }
            let Some(text) = node.attribute_as_string(&name) else {
                continue;
            };
            match handling {
                ProjectionNameAttributes::EndScan => break,
                ProjectionNameAttributes::Store => ProjectionValue::Text(text),
            }
        } else {
            match lower_name.as_str() {
                "towgs84" => {
                    let values: Vec<f64> = node
                        .numeric_attribute_values(&name)
                        .iter()
                        .map(Number::to_f64)
                        .collect();
                    if values.len() < 3 {
                        continue;
                    }
                    let Some(parameters) = BursaWolfParameters::new(WGS84_DATUM, &values) else {
                        log::warn!(
                            "{}: ignoring {name} with {} values, expected at most 7",
                            node.name(),
                            values.len()
                        );
                        continue;
                    };
                    ProjectionValue::BursaWolf(parameters)
                }
                // Explicit parameters take precedence over the WKT definition.
                "crs_wkt" => continue,
                _ => {
                    let values = node.numeric_attribute_values(&name);
                    match values.as_slice() {
                        [] => continue,
                        [value] => ProjectionValue::Number(*value),
                        values => ProjectionValue::Vector(values.iter().map(Number::to_f64).collect()),
                    }
                }
            }
        };
        if !definition.insert_if_absent(name.as_str(), value) {
            log::warn!(
                "{}: duplicated projection parameter {name}, keeping the first occurrence",
                node.name()
            );
        }
    }
    Some(definition)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::attribute::AttributeValue;

    /// A node declaring `false_easting` twice, with a different value each time it is read.
    struct DuplicatedNode {
        method: AttributeValue,
        false_easting: [AttributeValue; 2],
        reads: AtomicUsize,
    }

    impl Node for DuplicatedNode {
        fn name(&self) -> &str {
            "crs"
        }

        fn attribute_names(&self) -> Vec<String> {
            ["false_easting", "false_easting", GRID_MAPPING_NAME]
                .map(String::from)
                .to_vec()
        }

        fn attribute(&self, name: &str) -> Option<&AttributeValue> {
            match name {
                GRID_MAPPING_NAME => Some(&self.method),
                "false_easting" => {
                    let read = self.reads.fetch_add(1, Ordering::Relaxed);
                    self.false_easting.get(read)
                }
                _ => None,
            }
        }
    }

    #[test]
    fn bursa_wolf_parameters() {
        let parameters = BursaWolfParameters::new(WGS84_DATUM, &[-87.0, -98.0, -121.0]).unwrap();
        assert!(parameters.is_translation());
        assert_eq!(parameters.target_datum(), WGS84_DATUM);
        assert_eq!(parameters.values()[2], -121.0);
        assert!(BursaWolfParameters::new(WGS84_DATUM, &[1.0, 2.0]).is_none());
        assert!(BursaWolfParameters::new(WGS84_DATUM, &[0.0; 8]).is_none());
        let parameters =
            BursaWolfParameters::new(WGS84_DATUM, &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 1.5]).unwrap();
        assert!(!parameters.is_translation());
        assert_eq!(parameters.ds, 1.5);
    }

    #[test]
    fn projection_parameters_first_occurrence_wins() {
        let mut parameters = ProjectionParameters::new();
        assert!(parameters.insert_if_absent("false_easting", Number::Double(1.0).into()));
        assert!(!parameters.insert_if_absent("false_easting", Number::Double(2.0).into()));
        assert_eq!(parameters.get("false_easting").unwrap().as_f64(), Some(1.0));
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters.method(), None);
    }

    #[test]
    fn projection_of_duplicated_attribute() {
        let node = DuplicatedNode {
            method: "transverse_mercator".into(),
            false_easting: [500_000f64.into(), 0f64.into()],
            reads: AtomicUsize::new(0),
        };
        let parameters = projection_of(&node).unwrap();
        assert_eq!(parameters.method(), Some("transverse_mercator"));
        assert_eq!(
            parameters.get("false_easting").and_then(ProjectionValue::as_f64),
            Some(500_000.0)
        );
    }
}
