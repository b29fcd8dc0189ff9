//! Contracts of the coordinate reference system layer.
//!
//! Building coordinate reference systems and map projections is the responsibility of an external layer.
//! This module defines the narrow interfaces exchanged with it by [`Convention`](crate::convention::Convention)s.

use std::fmt::Debug;

use thiserror::Error;

/// A transform construction or evaluation error.
#[derive(Clone, Debug, Error)]
pub enum TransformError {
    /// The dimension of a point does not match the dimension of the transform.
    #[error("mismatched dimension {_0}, expected {_1}")]
    MismatchedDimension(usize, usize),
    /// A transform can not be inverted.
    #[error("transform is not invertible")]
    NonInvertible,
    /// Other
    #[error("{_0}")]
    Other(String),
}

impl From<&str> for TransformError {
    fn from(err_string: &str) -> Self {
        Self::Other(err_string.to_string())
    }
}

impl From<String> for TransformError {
    fn from(err_string: String) -> Self {
        Self::Other(err_string)
    }
}

/// A transform of coordinates from a source space to a target space.
pub trait MathTransform: Debug + Send + Sync {
    /// Return the number of source dimensions.
    fn source_dimensions(&self) -> usize;

    /// Return the number of target dimensions.
    fn target_dimensions(&self) -> usize;

    /// Transform `point` from the source space to the target space.
    ///
    /// # Errors
    /// Returns a [`TransformError`] if the point dimension is not [`source_dimensions`](MathTransform::source_dimensions)
    /// or if the transform fails for this point.
    fn transform(&self, point: &[f64]) -> Result<Vec<f64>, TransformError>;
}

/// A one-dimensional affine transform `y = scale × x + offset`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearTransform1D {
    scale: f64,
    offset: f64,
}

impl LinearTransform1D {
    /// Create a new linear transform.
    #[must_use]
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// Return the scale.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Return the offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Return true if this transform is the identity.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }

    /// Return the inverse transform.
    ///
    /// # Errors
    /// Returns [`TransformError::NonInvertible`] if the scale is zero or not finite.
    pub fn inverse(&self) -> Result<Self, TransformError> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return Err(TransformError::NonInvertible);
        }
        Ok(Self::new(1.0 / self.scale, -self.offset / self.scale))
    }

    /// Apply the transform to `value`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        self.scale.mul_add(value, self.offset)
    }
}

impl MathTransform for LinearTransform1D {
    fn source_dimensions(&self) -> usize {
        1
    }

    fn target_dimensions(&self) -> usize {
        1
    }

    fn transform(&self, point: &[f64]) -> Result<Vec<f64>, TransformError> {
        match point {
            [value] => Ok(vec![self.apply(*value)]),
            _ => Err(TransformError::MismatchedDimension(point.len(), 1)),
        }
    }
}

/// A projected coordinate reference system built by the external referencing layer.
pub trait ProjectedCrs: Send + Sync {
    /// Return the name of the coordinate reference system.
    fn name(&self) -> &str;

    /// Return the name of the base geographic coordinate reference system.
    fn base_crs_name(&self) -> &str;

    /// Return the transform from the base geographic coordinate reference system to the projected coordinates.
    fn projection(&self) -> std::sync::Arc<dyn MathTransform>;
}

/// A candidate de-warping transform applied to a two-dimensional localization grid before a linear fit.
///
/// Callers try each candidate returned by [`Convention::linearizers`](crate::convention::Convention::linearizers)
/// and keep the one giving the best linear fit.
pub trait Linearizer: Debug + Send + Sync {
    /// Return a name for diagnostics.
    fn name(&self) -> &str;

    /// Return true if the axes of the localization grid are swapped compared to the axes expected by the transform.
    fn axis_swap(&self) -> bool {
        false
    }

    /// Return the transform applied to the coordinates of the localization grid.
    fn transform(&self) -> std::sync::Arc<dyn MathTransform>;
}
