//! EDDS - Enfusion texture conversion library.
//!
//! This crate ties the EDDS crates together: it reconstructs DDS files from
//! EDDS containers and exports the top mip level as PNG and TIFF.
//!
//! # Crates
//!
//! - [`edds_common`] - Common utilities (binary reading, error types)
//! - [`edds_container`] - EDDS container parsing and LZ4 chain decoding
//! - [`edds_dds`] - DDS surface decoding and PNG/TIFF export
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use edds::prelude::*;
//!
//! let layout = OutputLayout::new("converted");
//! let options = ConvertOptions::default();
//! layout.create_dirs(&options)?;
//!
//! for input in find_edds_files(Path::new("textures"))? {
//!     for output in convert_file(&input, &layout, &options)? {
//!         println!("{} -> {}", input.display(), output.display());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;

// Re-export all sub-crates
pub use edds_common as common;
pub use edds_container as container;
pub use edds_dds as dds;

pub use convert::{
    convert_file, convert_to_dds, find_edds_files, ConvertOptions, OutputKind, OutputLayout,
};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        convert_file, convert_to_dds, find_edds_files, ConvertOptions, OutputKind, OutputLayout,
    };
    pub use edds_common::BinaryReader;
    pub use edds_container::{decode_edds, EddsContainer};
    pub use edds_dds::{decode_dds, save_image, DecodedImage, OutputFormat};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
