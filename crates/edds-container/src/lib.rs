//! EDDS texture container handling.
//!
//! An EDDS file wraps a DDS texture in a sequence of blocks:
//!
//! ```text
//! [128 bytes]  DDS header (copied verbatim)
//! [20 bytes]   DX10 extension, only when the header FourCC is "DX10"
//! repeated:
//!   [4 bytes]  tag, "COPY" or "LZ4 "
//!   [i32]      declared size
//! [...]        COPY payloads, then LZ4 payloads
//! ```
//!
//! The block table has no count and no terminator; it ends at the first tag
//! that is not a known block kind. Blocks hold the DDS body tail to head, so
//! reassembly writes the last declared block first.
//!
//! # Example
//!
//! ```no_run
//! use edds_container::EddsContainer;
//!
//! let container = EddsContainer::open("texture.edds")?;
//! for block in container.blocks() {
//!     println!("{:?}: {} bytes", block.kind, block.declared_size);
//! }
//! std::fs::write("texture.dds", container.to_dds())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;
mod header;
pub mod lz4;
mod scan;

pub use container::{decode_edds, decode_edds_from, EddsContainer};
pub use error::{Error, Result};
pub use header::{BlockKind, BlockRecord, ContainerHeader, DX10_HEADER_SIZE, HEADER_SIZE};
pub use lz4::{decompress_block, ChainDecoder};
pub use scan::scan_blocks;

/// File extension of EDDS containers.
pub const EDDS_EXTENSION: &str = "edds";
