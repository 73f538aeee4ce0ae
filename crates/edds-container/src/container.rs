//! EDDS container reading and DDS reassembly.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use edds_common::ReadExt;

use crate::header::{eof_as_malformed, BlockKind, BlockRecord, ContainerHeader};
use crate::lz4::decompress_block;
use crate::scan::scan_blocks;
use crate::Result;

/// A fully decoded EDDS container.
///
/// Holds the header, the block table and one decoded buffer per block, all
/// in declaration order.
#[derive(Debug, Clone)]
pub struct EddsContainer {
    header: ContainerHeader,
    blocks: Vec<BlockRecord>,
    decoded: Vec<Vec<u8>>,
}

impl EddsContainer {
    /// Open and decode an EDDS file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read(&mut reader)
    }

    /// Decode an EDDS container from a seekable stream.
    ///
    /// Payloads are stored kind by kind: every COPY payload in declaration
    /// order, followed by every LZ4 payload in declaration order.
    pub fn read<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Self> {
        let header = ContainerHeader::read_from(reader)?;
        let blocks = scan_blocks(reader)?;

        let mut decoded: Vec<Option<Vec<u8>>> = vec![None; blocks.len()];

        for (index, block) in blocks.iter().enumerate() {
            if block.kind == BlockKind::Copy {
                let payload = reader
                    .read_vec(block.payload_len()?)
                    .map_err(|e| eof_as_malformed(e, "COPY payload"))?;
                decoded[index] = Some(payload);
            }
        }

        for (index, block) in blocks.iter().enumerate() {
            if block.kind == BlockKind::Lz4 {
                decoded[index] = Some(decompress_block(reader, block.payload_len()?)?);
            }
        }

        // Each block was decoded by exactly one of the passes above.
        let decoded = decoded.into_iter().flatten().collect();

        Ok(Self {
            header,
            blocks,
            decoded,
        })
    }

    /// The container header.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// The block table in declaration order.
    pub fn blocks(&self) -> &[BlockRecord] {
        &self.blocks
    }

    /// Decoded block payloads in declaration order.
    pub fn decoded_blocks(&self) -> &[Vec<u8>] {
        &self.decoded
    }

    /// Length of the reconstructed DDS file.
    pub fn dds_len(&self) -> usize {
        self.header.len() + self.decoded.iter().map(Vec::len).sum::<usize>()
    }

    /// Reassemble the DDS file.
    ///
    /// Blocks are declared head to tail but hold the file tail to head, so
    /// the last declared block is written first, right after the header.
    pub fn to_dds(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.dds_len());
        self.header.write_to(&mut output);
        for block in self.decoded.iter().rev() {
            output.extend_from_slice(block);
        }
        output
    }
}

/// Decode an EDDS file into the bytes of the DDS file it wraps.
pub fn decode_edds<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    EddsContainer::open(path).map(|container| container.to_dds())
}

/// Decode an EDDS stream into the bytes of the DDS file it wraps.
pub fn decode_edds_from<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Vec<u8>> {
    EddsContainer::read(reader).map(|container| container.to_dds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::header::{DX10_HEADER_SIZE, HEADER_SIZE};

    fn plain_header() -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];
        header[..4].copy_from_slice(b"DDS ");
        header[84..88].copy_from_slice(b"DXT1");
        header
    }

    fn dx10_header() -> Vec<u8> {
        let mut header = plain_header();
        header[84..88].copy_from_slice(b"DX10");
        header.extend((1..=DX10_HEADER_SIZE as u8).collect::<Vec<_>>());
        header
    }

    fn record(tag: &[u8; 4], size: usize) -> Vec<u8> {
        let mut data = tag.to_vec();
        data.extend_from_slice(&(size as i32).to_le_bytes());
        data
    }

    /// Frame `data` as an LZ4 block made of literal-only chunks.
    fn lz4_payload(data: &[u8], chunk_size: usize) -> Vec<u8> {
        let mut payload = (data.len() as u32).to_le_bytes().to_vec();
        for piece in data.chunks(chunk_size) {
            let chunk = lz4_flex::block::compress(piece);
            payload.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
            payload.extend_from_slice(&chunk);
        }
        payload
    }

    /// Build an EDDS file out of COPY pieces followed by LZ4 pieces.
    fn build_edds(header: &[u8], copies: &[&[u8]], lz4s: &[&[u8]]) -> Vec<u8> {
        let lz4_payloads: Vec<Vec<u8>> = lz4s.iter().map(|d| lz4_payload(d, 1000)).collect();

        let mut data = header.to_vec();
        for copy in copies {
            data.extend(record(b"COPY", copy.len()));
        }
        for payload in &lz4_payloads {
            data.extend(record(b"LZ4 ", payload.len()));
        }
        for copy in copies {
            data.extend_from_slice(copy);
        }
        for payload in &lz4_payloads {
            data.extend_from_slice(payload);
        }
        data
    }

    #[test]
    fn test_hello_scenario() {
        let header = plain_header();
        // Single literal-only chunk producing "HELLO".
        let chunk = b"\x50HELLO";
        let mut lz4 = 5u32.to_le_bytes().to_vec();
        lz4.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        lz4.extend_from_slice(chunk);

        let mut data = header.clone();
        data.extend(record(b"COPY", 5));
        data.extend(record(b"LZ4 ", lz4.len()));
        // The first COPY payload doubles as the table terminator.
        data.extend_from_slice(b"WORLD");
        data.extend_from_slice(&lz4);

        let dds = decode_edds_from(&mut Cursor::new(data)).unwrap();

        let mut expected = header;
        expected.extend_from_slice(b"HELLO");
        expected.extend_from_slice(b"WORLD");
        assert_eq!(dds, expected);
    }

    #[test]
    fn test_roundtrip_reverse_layout() {
        // A DDS body split tail to head: the last declared block is the start.
        let body: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let (head, rest) = body.split_at(3000);
        let (middle, tail) = rest.split_at(4000);

        let header = plain_header();
        let edds = build_edds(&header, &[tail], &[middle, head]);

        let container = EddsContainer::read(&mut Cursor::new(edds)).unwrap();
        assert_eq!(container.blocks().len(), 3);

        let mut expected = header;
        expected.extend_from_slice(&body);
        assert_eq!(container.dds_len(), expected.len());
        assert_eq!(container.to_dds(), expected);
    }

    #[test]
    fn test_block_order_inversion() {
        let header = plain_header();
        let edds = build_edds(&header, &[b"one", b"two"], &[b"three", b"four"]);

        let container = EddsContainer::read(&mut Cursor::new(edds)).unwrap();
        let decoded: Vec<&[u8]> = container.decoded_blocks().iter().map(Vec::as_slice).collect();
        assert_eq!(decoded, vec![&b"one"[..], b"two", b"three", b"four"]);

        let dds = container.to_dds();
        assert_eq!(&dds[..HEADER_SIZE], &header[..]);
        assert_eq!(&dds[HEADER_SIZE..], b"fourthreetwoone");
    }

    #[test]
    fn test_interleaved_declaration_order() {
        let header = plain_header();
        let first = lz4_payload(b"AAAA", 1000);

        let mut data = header.clone();
        data.extend(record(b"LZ4 ", first.len()));
        data.extend(record(b"COPY", 4));
        // COPY payloads are stored before LZ4 payloads.
        data.extend_from_slice(b"BBBB");
        data.extend_from_slice(&first);

        let dds = decode_edds_from(&mut Cursor::new(data)).unwrap();
        assert_eq!(&dds[HEADER_SIZE..], b"BBBBAAAA");
    }

    #[test]
    fn test_dx10_header_preserved() {
        let header = dx10_header();
        // At least 8 payload bytes, so the table terminator read completes.
        let body = b"\xAA\xBB\xCC\xDD\x11\x22\x33\x44";
        let edds = build_edds(&header, &[body], &[]);

        let container = EddsContainer::read(&mut Cursor::new(edds)).unwrap();
        assert!(container.header().is_dx10());

        let dds = container.to_dds();
        assert_eq!(&dds[..HEADER_SIZE + DX10_HEADER_SIZE], &header[..]);
        assert_eq!(&dds[HEADER_SIZE + DX10_HEADER_SIZE..], body);
    }

    #[test]
    fn test_copy_block_identity() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let edds = build_edds(&plain_header(), &[&payload], &[]);

        let container = EddsContainer::read(&mut Cursor::new(edds)).unwrap();
        assert_eq!(container.decoded_blocks()[0], payload);
    }

    #[test]
    fn test_short_input_is_malformed() {
        let err = decode_edds_from(&mut Cursor::new(vec![0u8; 64])).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_truncated_copy_payload() {
        let mut edds = build_edds(&plain_header(), &[b"0123456789"], &[]);
        edds.truncate(edds.len() - 2);

        let err = decode_edds_from(&mut Cursor::new(edds)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_negative_copy_size() {
        let mut data = plain_header();
        data.extend_from_slice(b"COPY");
        data.extend_from_slice(&(-5i32).to_le_bytes());
        data.extend_from_slice(b"payload!");

        let err = decode_edds_from(&mut Cursor::new(data)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_corrupt_lz4_block() {
        // A match pointing 5 bytes back before anything was produced.
        let chunk = b"\x00\x05\x00";
        let mut lz4 = 4u32.to_le_bytes().to_vec();
        lz4.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        lz4.extend_from_slice(chunk);

        let mut data = plain_header();
        data.extend(record(b"LZ4 ", lz4.len()));
        data.extend_from_slice(&lz4);

        let err = decode_edds_from(&mut Cursor::new(data)).unwrap_err();
        assert!(err.is_decompression());
    }

    #[test]
    fn test_open_from_disk() {
        let body = b"surface bytes".to_vec();
        let edds = build_edds(&plain_header(), &[], &[&body]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texture.edds");
        std::fs::write(&path, edds).unwrap();

        let dds = decode_edds(&path).unwrap();
        assert_eq!(&dds[HEADER_SIZE..], &body[..]);
    }
}
