use derive_more::Display;

use crate::{node::Variable, referencing::LinearTransform1D};

use super::range::{ADD_OFFSET, SCALE_FACTOR};

/// The function converting packed values to measurements: `measurement = scale × packed + offset`.
#[derive(Copy, Clone, Debug, PartialEq, Display)]
#[display("{scale} × x + {offset}")]
pub struct TransferFunction {
    scale: f64,
    offset: f64,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl TransferFunction {
    /// Create a new transfer function.
    #[must_use]
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// Return the scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the scale factor.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Return the offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Set the offset.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Convert a packed value to a measurement.
    #[must_use]
    pub fn apply(&self, packed: f64) -> f64 {
        self.to_transform().apply(packed)
    }

    /// Return the transfer function as a transform.
    #[must_use]
    pub const fn to_transform(&self) -> LinearTransform1D {
        LinearTransform1D::new(self.scale, self.offset)
    }
}

/// Build the transfer function of `variable` from its scale factor and offset attributes.
///
/// Absent or non-numeric attributes leave the identity values.
pub(crate) fn transfer_function_of(variable: &dyn Variable) -> TransferFunction {
    let mut function = TransferFunction::default();
    let scale = variable.attribute_as_number(SCALE_FACTOR);
    let offset = variable.attribute_as_number(ADD_OFFSET);
    if !scale.is_nan() {
        function.set_scale(scale);
    }
    if !offset.is_nan() {
        function.set_offset(offset);
    }
    function
}
