//! In-memory implementations of the [file model](super) traits.
//!
//! These are useful for synthetic files and for testing conventions and grids without a file format decoder.
//!
//! ```rust
//! # use ncgrid::{data_type::DataType, node::{Dimension, Variable, memory::MemoryVariable}};
//! let variable = MemoryVariable::new("T", DataType::Short, vec![Dimension::new("y", 4), Dimension::new("x", 5)])
//!     .with_attribute("valid_range", vec![0i16, 100])
//!     .with_attribute("units", "K");
//! assert_eq!(variable.unit().as_deref(), Some("K"));
//! ```

use std::sync::Arc;

use crate::{
    attribute::AttributeValue,
    data_type::DataType,
    node::{
        AxisPositive, AxisType, CoordinateAxis, CoordinateSystem, Decoder, Dimension, Node,
        Variable,
    },
};

/// A node with attributes held in memory, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct MemoryNode {
    name: String,
    attributes: Vec<(String, AttributeValue)>,
}

impl MemoryNode {
    /// Create a new node without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add or replace an attribute. A replaced attribute keeps its declaration position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.set_attribute(name, value);
        self
    }
}

impl Node for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(name, _)| name.clone()).collect()
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find_map(|(n, value)| (n == name).then_some(value))
    }
}

/// A variable held in memory.
#[derive(Clone, Debug)]
pub struct MemoryVariable {
    node: MemoryNode,
    data_type: DataType,
    dimensions: Vec<Dimension>,
    coordinate_system_axis: bool,
}

impl MemoryVariable {
    /// Create a new variable with `dimensions` in storage order.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType, dimensions: Vec<Dimension>) -> Self {
        Self {
            node: MemoryNode::new(name),
            data_type,
            dimensions,
            coordinate_system_axis: false,
        }
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.node.set_attribute(name, value);
        self
    }

    /// Flag the variable as a coordinate system axis.
    #[must_use]
    pub fn with_coordinate_system_axis(mut self, coordinate_system_axis: bool) -> Self {
        self.coordinate_system_axis = coordinate_system_axis;
        self
    }
}

impl Node for MemoryVariable {
    fn name(&self) -> &str {
        self.node.name()
    }

    fn attribute_names(&self) -> Vec<String> {
        self.node.attribute_names()
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.node.attribute(name)
    }
}

impl Variable for MemoryVariable {
    fn as_node(&self) -> &dyn Node {
        self
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn is_coordinate_system_axis(&self) -> bool {
        self.coordinate_system_axis
    }
}

/// A coordinate axis held in memory.
#[derive(Clone, Debug)]
pub struct MemoryCoordinateAxis {
    name: String,
    axis_type: Option<AxisType>,
    positive: Option<AxisPositive>,
    dimensions: Vec<Dimension>,
}

impl MemoryCoordinateAxis {
    /// Create a new coordinate axis backed by the variable `name`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        axis_type: Option<AxisType>,
        dimensions: Vec<Dimension>,
    ) -> Self {
        Self {
            name: name.into(),
            axis_type,
            positive: None,
            dimensions,
        }
    }

    /// Set the direction of increasing values.
    #[must_use]
    pub fn with_positive(mut self, positive: AxisPositive) -> Self {
        self.positive = Some(positive);
        self
    }
}

impl CoordinateAxis for MemoryCoordinateAxis {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis_type(&self) -> Option<AxisType> {
        self.axis_type
    }

    fn positive(&self) -> Option<AxisPositive> {
        self.positive
    }

    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }
}

/// A coordinate system held in memory.
#[derive(Clone)]
pub struct MemoryCoordinateSystem {
    name: String,
    domain: Vec<Dimension>,
    axes: Vec<Arc<dyn CoordinateAxis>>,
}

impl MemoryCoordinateSystem {
    /// Create a new coordinate system with a `domain` in storage order.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        domain: Vec<Dimension>,
        axes: Vec<Arc<dyn CoordinateAxis>>,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            axes,
        }
    }
}

impl std::fmt::Debug for MemoryCoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCoordinateSystem")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field(
                "axes",
                &self.axes.iter().map(|axis| axis.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CoordinateSystem for MemoryCoordinateSystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> &[Dimension] {
        &self.domain
    }

    fn coordinate_axes(&self) -> &[Arc<dyn CoordinateAxis>] {
        &self.axes
    }
}

/// A decoder of a file held in memory.
///
/// The root group holds the global attributes. Named groups are searched when listed in the search path.
#[derive(Default)]
pub struct MemoryDecoder {
    filename: String,
    search_path: Vec<Option<String>>,
    root: MemoryNode,
    groups: Vec<Arc<MemoryNode>>,
    variables: Vec<Arc<MemoryVariable>>,
    coordinate_systems: Vec<Arc<dyn CoordinateSystem>>,
}

impl MemoryDecoder {
    /// Create a new decoder of an empty file, searching only the root group.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            search_path: vec![None],
            ..Default::default()
        }
    }

    /// Add or replace a global attribute of the root group.
    #[must_use]
    pub fn with_global_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.root.set_attribute(name, value);
        self
    }

    /// Add a group.
    #[must_use]
    pub fn with_group(mut self, group: MemoryNode) -> Self {
        self.groups.push(Arc::new(group));
        self
    }

    /// Add a variable.
    #[must_use]
    pub fn with_variable(mut self, variable: MemoryVariable) -> Self {
        self.variables.push(Arc::new(variable));
        self
    }

    /// Add a coordinate system.
    #[must_use]
    pub fn with_coordinate_system(mut self, coordinate_system: MemoryCoordinateSystem) -> Self {
        self.coordinate_systems.push(Arc::new(coordinate_system));
        self
    }

    fn group(&self, name: Option<&str>) -> Option<&MemoryNode> {
        match name {
            None => Some(&self.root),
            Some(name) => self
                .groups
                .iter()
                .find(|group| group.name() == name)
                .map(AsRef::as_ref),
        }
    }
}

impl Decoder for MemoryDecoder {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn search_path(&self) -> Vec<Option<String>> {
        self.search_path.clone()
    }

    fn set_search_path(&mut self, search_path: &[Option<String>]) {
        self.search_path = search_path.to_vec();
    }

    fn global_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.search_path
            .iter()
            .filter_map(|group| self.group(group.as_deref()))
            .find_map(|group| group.attribute(name))
    }

    fn variables(&self) -> Vec<Arc<dyn Variable>> {
        self.variables
            .iter()
            .map(|variable| Arc::clone(variable) as Arc<dyn Variable>)
            .collect()
    }

    fn find_node(&self, name: &str) -> Option<Arc<dyn Node>> {
        if let Some(variable) = self.variables.iter().find(|v| v.name() == name) {
            return Some(Arc::clone(variable) as Arc<dyn Node>);
        }
        self.groups
            .iter()
            .find(|group| group.name() == name)
            .map(|group| Arc::clone(group) as Arc<dyn Node>)
    }

    fn coordinate_systems(&self) -> Vec<Arc<dyn CoordinateSystem>> {
        self.coordinate_systems.clone()
    }
}
