//! DDS decoding for textures reconstructed from EDDS containers.
//!
//! Decodes the top mip level of a DDS file into a plain pixel buffer and
//! writes it out as PNG or TIFF. Supported surfaces are the BC1-BC5 and BC7
//! block formats plus 8-bit-per-channel uncompressed RGB(A), BGR(A) and
//! single-channel data. Anything else is reported as
//! [`Error::UnsupportedFormat`].
//!
//! # Example
//!
//! ```no_run
//! use edds_dds::{decode_dds, save_image, OutputFormat};
//!
//! let data = std::fs::read("texture.dds")?;
//! let image = decode_dds(&data)?;
//! println!("{}x{} {:?}", image.width, image.height, image.format);
//! save_image(&image, "texture.png", OutputFormat::Png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decode;
mod error;
mod export;
mod format;
mod header;

pub use decode::{decode_dds, decode_surface, DecodedImage};
pub use error::{Error, Result};
pub use export::{encode_image, save_image, OutputFormat};
pub use format::{PixelFormat, SurfaceFormat};
pub use header::{dxgi, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
