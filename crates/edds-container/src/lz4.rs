//! Chained LZ4 decompression for `LZ4 ` blocks.
//!
//! An LZ4 block payload looks like this:
//!
//! ```text
//! u32       total decompressed size
//! repeated:
//!   u32     chunk length (high bit reserved, masked off)
//!   [u8]    LZ4 block-format data, at most 64KB once decoded
//! ```
//!
//! Chunks are not independent: each one may copy from the bytes produced by
//! earlier chunks of the same block, up to a 64KB window back. The window is
//! owned by a [`ChainDecoder`] that lives for exactly one block.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{Error, Result};

/// Size of the sliding dictionary window.
pub const WINDOW_SIZE: usize = 64 * 1024;

/// Size of the working buffer a single chunk decodes into.
pub const CHUNK_BUFFER_SIZE: usize = 64 * 1024;

/// Mask applied to chunk lengths. The high bit is reserved.
const CHUNK_LEN_MASK: u32 = 0x7FFF_FFFF;

/// Upper bound on the output buffer reserved before any chunk is decoded.
const INITIAL_OUTPUT_CAPACITY: usize = 16 * CHUNK_BUFFER_SIZE;

/// Smallest framed chunk: a 4-byte length and one byte of LZ4 data.
const MIN_FRAMED_CHUNK: usize = 5;

/// LZ4 decoder whose dictionary carries over from one chunk to the next.
///
/// Create one per block and feed it the block's chunks in stream order.
#[derive(Debug)]
pub struct ChainDecoder {
    window: Vec<u8>,
}

impl ChainDecoder {
    /// Create a decoder with an empty dictionary.
    pub fn new() -> Self {
        Self {
            window: Vec::with_capacity(2 * WINDOW_SIZE),
        }
    }

    /// Forget everything decoded so far.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Decode one chunk into `dst`, returning the number of bytes produced.
    ///
    /// The produced bytes become part of the dictionary for the next chunk.
    pub fn decode_chunk(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let produced = lz4_flex::block::decompress_into_with_dict(src, dst, &self.window)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        self.slide(&dst[..produced]);
        tracing::trace!(
            compressed = src.len(),
            produced,
            window = self.window.len(),
            "decoded chunk"
        );
        Ok(produced)
    }

    fn slide(&mut self, data: &[u8]) {
        if data.len() >= WINDOW_SIZE {
            self.window.clear();
            self.window
                .extend_from_slice(&data[data.len() - WINDOW_SIZE..]);
            return;
        }

        let excess = (self.window.len() + data.len()).saturating_sub(WINDOW_SIZE);
        self.window.drain(..excess);
        self.window.extend_from_slice(data);
    }
}

impl Default for ChainDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decompress one `LZ4 ` block from `reader`.
///
/// `declared_size` is the size from the block record: the framed payload
/// length including the leading 4-byte total size. Exactly that many bytes
/// are consumed from the stream on success.
pub fn decompress_block<R: Read + ?Sized>(reader: &mut R, declared_size: usize) -> Result<Vec<u8>> {
    let body = declared_size.checked_sub(4).ok_or_else(|| {
        Error::MalformedContainer(format!("LZ4 block declares invalid size {}", declared_size))
    })?;

    let total = reader.read_u32::<LittleEndian>().map_err(truncated)? as usize;

    // Every chunk takes at least MIN_FRAMED_CHUNK bytes and yields at most
    // CHUNK_BUFFER_SIZE bytes.
    let capacity = (body / MIN_FRAMED_CHUNK).saturating_mul(CHUNK_BUFFER_SIZE);
    if total > capacity {
        return Err(Error::Decompression(format!(
            "declared size {} cannot be produced from {} compressed bytes",
            total, body
        )));
    }

    tracing::debug!(declared_size, total, "decompressing LZ4 block");

    // Grown as chunks decode, so a lying header cannot force a huge allocation.
    let mut output = Vec::with_capacity(total.min(INITIAL_OUTPUT_CAPACITY));
    let mut decoder = ChainDecoder::new();
    let mut chunk = vec![0u8; CHUNK_BUFFER_SIZE];
    let mut compressed = Vec::new();
    let mut consumed = 0usize;

    while consumed < body {
        let remaining = body - consumed;
        if remaining < 4 {
            return Err(Error::Decompression(format!(
                "{} trailing bytes cannot hold a chunk header",
                remaining
            )));
        }

        let len = (reader.read_u32::<LittleEndian>().map_err(truncated)? & CHUNK_LEN_MASK) as usize;
        if len > remaining - 4 {
            return Err(Error::Decompression(format!(
                "chunk of {} bytes exceeds the {} bytes left in the block",
                len,
                remaining - 4
            )));
        }

        compressed.resize(len, 0);
        reader.read_exact(&mut compressed).map_err(truncated)?;

        let produced = decoder.decode_chunk(&compressed, &mut chunk)?;
        if output.len() + produced > total {
            return Err(Error::Decompression(format!(
                "chunk output overflows the declared size {}",
                total
            )));
        }

        output.extend_from_slice(&chunk[..produced]);
        consumed += len + 4;
    }

    if output.len() != total {
        return Err(Error::SizeMismatch {
            expected: total,
            actual: output.len(),
        });
    }

    Ok(output)
}

fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Decompression("truncated LZ4 block".into())
    } else {
        Error::Io(err)
    }
}
