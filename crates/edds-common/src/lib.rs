//! Common utilities for the EDDS tools.
//!
//! This crate provides the binary reading primitives shared by the container
//! and DDS crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`ReadExt`] - Fixed-size reads from `std::io` streams

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};
