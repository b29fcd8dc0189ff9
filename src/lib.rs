//! The array access core of a reader for self-describing gridded data files (netCDF and alike).
//!
//! This crate sits between a file format decoder and the layers building coordinate reference systems and rasters.
//! It provides three tightly coupled pieces:
//!  - a [`Convention`](convention::Convention) policy resolving producer specific and implicit metadata
//!    (valid ranges, no-data values, transfer functions, variable roles, map projection parameters),
//!  - a [`GridWrapper`](grid::GridWrapper) reconciling the dimension order declared by a coordinate system
//!    with the dimension order of each variable using it, and
//!  - a [`HyperRectangleReader`](io::HyperRectangleReader) extracting an arbitrary sub-hyperrectangle of a
//!    variable from a random access byte source with a minimal number of seeks.
//!
//! The file format decoder itself is an external collaborator, consumed through the traits of the [`node`] module.
//! The [`node::memory`] module implements those traits for synthetic in-memory files.
//!
//! ## Example
//! ```rust
//! # use ncgrid::{data_type::DataType, io::{HyperRectangleReader, MemoryDataInput, Endianness, Region}};
//! // A 4x5 grid of big-endian 32-bit integers.
//! let bytes: Vec<u8> = (0..20i32).flat_map(i32::to_be_bytes).collect();
//! let input = MemoryDataInput::new("grid.nc", bytes, Endianness::Big);
//! let mut reader = HyperRectangleReader::new(DataType::Int, input, 0)?;
//!
//! // Rows 1..3 and columns 2..5, in declaration (slowest first) order.
//! let region = Region::from_row_major(&[4, 5], &[1, 2], &[2, 3], &[1, 1])?;
//! let values = reader.read(&region)?;
//! assert_eq!(values.as_int(), Some(&[7, 8, 9, 12, 13, 14][..]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Features
//! #### Default
//!  - `ndarray`: [`ndarray`] utility functions for [`HyperRectangleReader`](io::HyperRectangleReader).
//!
//! ## Licence
//! `ncgrid` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod attribute;
pub mod config;
pub mod convention;
pub mod data_type;
pub mod error;
pub mod grid;
pub mod io;
pub mod node;
pub mod plugin;
pub mod referencing;
