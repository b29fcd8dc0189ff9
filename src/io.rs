//! Strided extraction of hyperrectangles from random access byte sources.
//!
//! A [`HyperRectangleReader`] reads the elements of one variable stored contiguously from an `origin` byte offset of a
//! [`DataInput`]. Each call to [`HyperRectangleReader::read`] extracts the elements selected by one [`Region`] with
//! one seek per contiguous run.
//!
//! [`DataInput`] implementations:
//!  - [`ChannelDataInput`]: a buffered [`std::io::Read`] + [`std::io::Seek`] source, such as a [`std::fs::File`].
//!  - [`MemoryDataInput`]: a [`bytes::Bytes`] buffer.
//!  - [`PerformanceMetricsDataInput`]: wraps another [`DataInput`] and counts seeks, reads and bytes read.

mod data_input;
mod data_transfer;
mod endianness;
mod hyper_rectangle_reader;
mod region;

pub use data_input::{ChannelDataInput, DataInput, MemoryDataInput, PerformanceMetricsDataInput};
pub use data_transfer::{DataTransfer, ElementKind, PrimitiveArray, UnsupportedElementKindError};
pub use endianness::{Endianness, NATIVE_ENDIAN};
pub use hyper_rectangle_reader::HyperRectangleReader;
pub use region::{Region, RegionError};
