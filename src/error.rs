//! Error taxonomy shared by conventions, grids and readers.
//!
//! All errors are local failures of one call. None of them leave a [`Convention`](crate::convention::Convention),
//! [`GridWrapper`](crate::grid::GridWrapper) or [`HyperRectangleReader`](crate::io::HyperRectangleReader)
//! in an inconsistent state, so repeating the call with the same inputs is always safe.

use thiserror::Error;

/// A data store error.
#[derive(Debug, Error)]
pub enum DataStoreError {
    /// Malformed or self-inconsistent metadata.
    #[error(transparent)]
    Content(#[from] DataStoreContentError),
    /// A failure reading or seeking the underlying byte source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A size or index exceeding the representable range.
    #[error(transparent)]
    Overflow(#[from] ArithmeticOverflowError),
}

/// A content error: the file metadata is malformed or self-inconsistent.
#[derive(Clone, Debug, Error)]
#[error("{_0}")]
pub struct DataStoreContentError(String);

impl DataStoreContentError {
    /// Create a new content error with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Return the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DataStoreContentError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for DataStoreContentError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// An arithmetic overflow error. Holds the name of the quantity which overflowed.
#[derive(Clone, Debug, Error)]
#[error("arithmetic overflow computing {_0}")]
pub struct ArithmeticOverflowError(&'static str);

impl ArithmeticOverflowError {
    /// Create a new overflow error for `quantity`.
    #[must_use]
    pub const fn new(quantity: &'static str) -> Self {
        Self(quantity)
    }

    /// Return the name of the quantity which overflowed.
    #[must_use]
    pub const fn quantity(&self) -> &'static str {
        self.0
    }
}
