//! EDDS container header and block records.

use std::fmt;
use std::io::{self, Read};

use crate::{Error, Result};

/// Size of the DDS-compatible header at the start of every container.
pub const HEADER_SIZE: usize = 128;

/// Size of the DX10 extension header.
pub const DX10_HEADER_SIZE: usize = 20;

/// Offset of the pixel format FourCC inside the header.
const FOURCC_OFFSET: usize = 84;

/// FourCC announcing a DX10 extension header.
const DX10_FOURCC: &[u8; 4] = b"DX10";

/// The leading header of an EDDS container.
///
/// Structurally this is the header of the DDS file being wrapped. It is kept
/// as raw bytes and copied verbatim into the reconstructed output.
#[derive(Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    main: [u8; HEADER_SIZE],
    dx10: Option<[u8; DX10_HEADER_SIZE]>,
}

impl ContainerHeader {
    /// Read the 128-byte header and, when announced, the 20-byte DX10 extension.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut main = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut main)
            .map_err(|e| eof_as_malformed(e, "container header"))?;

        let dx10 = if &main[FOURCC_OFFSET..FOURCC_OFFSET + 4] == DX10_FOURCC {
            let mut ext = [0u8; DX10_HEADER_SIZE];
            reader
                .read_exact(&mut ext)
                .map_err(|e| eof_as_malformed(e, "DX10 extension header"))?;
            Some(ext)
        } else {
            None
        };

        tracing::debug!(dx10 = dx10.is_some(), "read container header");
        Ok(Self { main, dx10 })
    }

    /// Check if this header carries a DX10 extension.
    pub fn is_dx10(&self) -> bool {
        self.dx10.is_some()
    }

    /// Total header length in bytes (128 or 148).
    pub fn len(&self) -> usize {
        HEADER_SIZE + if self.is_dx10() { DX10_HEADER_SIZE } else { 0 }
    }

    /// Append the header bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.main);
        if let Some(ext) = &self.dx10 {
            out.extend_from_slice(ext);
        }
    }
}

impl fmt::Debug for ContainerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerHeader")
            .field("len", &self.len())
            .field("dx10", &self.is_dx10())
            .finish()
    }
}

/// The kind of a block record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Raw bytes stored verbatim.
    Copy,
    /// Chunked LZ4 data decoded with a chained dictionary.
    Lz4,
}

impl BlockKind {
    /// Tag of a raw block.
    pub const COPY_TAG: [u8; 4] = *b"COPY";
    /// Tag of an LZ4 block. The trailing space is part of the tag.
    pub const LZ4_TAG: [u8; 4] = *b"LZ4 ";

    /// Map a 4-byte tag to a block kind.
    pub fn from_tag(tag: &[u8; 4]) -> Option<Self> {
        match *tag {
            Self::COPY_TAG => Some(Self::Copy),
            Self::LZ4_TAG => Some(Self::Lz4),
            _ => None,
        }
    }
}

/// A block record from the container's block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRecord {
    /// Block kind.
    pub kind: BlockKind,
    /// Size as stored in the file.
    ///
    /// For COPY blocks this is the payload length. For LZ4 blocks it is the
    /// framed compressed length including the leading 4-byte total size.
    pub declared_size: i32,
}

impl BlockRecord {
    /// Create a new block record.
    pub const fn new(kind: BlockKind, declared_size: i32) -> Self {
        Self {
            kind,
            declared_size,
        }
    }

    /// Number of payload bytes this block occupies in the stream.
    pub fn payload_len(&self) -> Result<usize> {
        let min = match self.kind {
            BlockKind::Copy => 0,
            BlockKind::Lz4 => 4,
        };
        if self.declared_size < min {
            return Err(Error::MalformedContainer(format!(
                "{:?} block declares invalid size {}",
                self.kind, self.declared_size
            )));
        }
        Ok(self.declared_size as usize)
    }
}

/// Map an unexpected end of stream to `MalformedContainer`.
pub(crate) fn eof_as_malformed(err: io::Error, what: &str) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::MalformedContainer(format!("truncated {}", what))
    } else {
        Error::Io(err)
    }
}
