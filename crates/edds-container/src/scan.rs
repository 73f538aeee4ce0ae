//! Block table scanning.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use edds_common::ReadExt;

use crate::header::{eof_as_malformed, BlockKind, BlockRecord};
use crate::Result;

/// Length of a block record in the stream (tag + size).
const RECORD_SIZE: i64 = 8;

/// Scan the block table that follows the container header.
///
/// Records are read until a tag that is neither `COPY` nor `LZ4 ` shows up.
/// That tag and its size are not consumed: the stream is rewound by 8 bytes
/// so that it points at the first byte of block payload data.
///
/// Block payloads can spell a valid tag by coincidence; the format has no
/// terminator, so such a file is misparsed.
pub fn scan_blocks<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Vec<BlockRecord>> {
    let mut blocks = Vec::new();

    loop {
        let tag = reader
            .read_tag()
            .map_err(|e| eof_as_malformed(e, "block table"))?;
        let size = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| eof_as_malformed(e, "block table"))?;

        match BlockKind::from_tag(&tag) {
            Some(kind) => {
                tracing::debug!(index = blocks.len(), ?kind, size, "found block");
                blocks.push(BlockRecord::new(kind, size));
            }
            None => {
                reader.seek(SeekFrom::Current(-RECORD_SIZE))?;
                break;
            }
        }
    }

    Ok(blocks)
}
