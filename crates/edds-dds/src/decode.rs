//! DDS surface decoding.
//!
//! Only the top mip level of the first surface is decoded. Block-compressed
//! data goes through 4x4 tiles; uncompressed data is reordered to RGB(A).

use edds_common::BinaryReader;

use crate::format::{PixelFormat, SurfaceFormat};
use crate::header::{DdsHeader, DdsHeaderDxt10};
use crate::{Error, Result, DDS_MAGIC};

/// RGBA bytes of one decoded 4x4 tile.
type Tile = [u8; 64];

/// Row pitch of a [`Tile`].
const TILE_PITCH: usize = 16;

/// Decoded pixels of a DDS surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Pixel rows, `stride` bytes apart.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes between the start of two rows.
    pub stride: usize,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl DecodedImage {
    /// Pixel data without any row padding.
    pub fn packed_rows(&self) -> Vec<u8> {
        let row = self.width as usize * self.format.bytes_per_pixel();
        if row == self.stride {
            return self.data.clone();
        }
        self.data
            .chunks(self.stride)
            .take(self.height as usize)
            .flat_map(|line| &line[..row.min(line.len())])
            .copied()
            .collect()
    }
}

/// Decode the top-level surface of a DDS file.
pub fn decode_dds(data: &[u8]) -> Result<DecodedImage> {
    let mut reader = BinaryReader::new(data);
    reader.expect_magic(DDS_MAGIC).map_err(|e| match e {
        edds_common::Error::InvalidMagic { actual, .. } => {
            Error::InvalidMagic(<[u8; 4]>::try_from(actual.as_slice()).unwrap_or_default())
        }
        _ => Error::InvalidHeader("file too small".into()),
    })?;

    let header: DdsHeader = reader.read_struct()?;
    let dx10: Option<DdsHeaderDxt10> = if header.is_dx10() {
        Some(reader.read_struct()?)
    } else {
        None
    };

    let format = SurfaceFormat::from_header(&header, dx10.as_ref())?;
    let (width, height) = (header.width, header.height);

    tracing::debug!(?format, width, height, "decoding DDS surface");
    decode_surface(format, reader.remaining_bytes(), width, height)
}

/// Decode the first `width` x `height` surface of `format` stored in `data`.
///
/// Trailing bytes, such as further mip levels, are ignored.
pub fn decode_surface(
    format: SurfaceFormat,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<DecodedImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidHeader(format!(
            "empty surface {}x{}",
            width, height
        )));
    }

    // Both sizes are checked before anything is allocated.
    let expected = format.surface_size(width, height)?;
    format.decoded_size(width, height)?;
    if data.len() < expected {
        return Err(Error::TruncatedSurface {
            expected,
            actual: data.len(),
        });
    }
    let data = &data[..expected];

    let pixel_format = format.pixel_format();
    let bpp = pixel_format.bytes_per_pixel();

    let pixels = match format {
        SurfaceFormat::Bc1 => decode_blocks(data, width, height, 8, bpp, |b, t| {
            bcdec_rs::bc1(b, t, TILE_PITCH)
        }),
        SurfaceFormat::Bc2 => decode_blocks(data, width, height, 16, bpp, |b, t| {
            bcdec_rs::bc2(b, t, TILE_PITCH)
        }),
        SurfaceFormat::Bc3 => decode_blocks(data, width, height, 16, bpp, |b, t| {
            bcdec_rs::bc3(b, t, TILE_PITCH)
        }),
        SurfaceFormat::Bc7 => decode_blocks(data, width, height, 16, bpp, |b, t| {
            bcdec_rs::bc7(b, t, TILE_PITCH)
        }),
        SurfaceFormat::Bc4 => decode_blocks(data, width, height, 8, bpp, decode_bc4_tile),
        SurfaceFormat::Bc5 => decode_blocks(data, width, height, 16, bpp, decode_bc5_tile),
        SurfaceFormat::Rgba8 | SurfaceFormat::L8 => data.to_vec(),
        SurfaceFormat::Rgbx8 => data
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2], 0xFF])
            .collect(),
        SurfaceFormat::Bgra8 => data
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect(),
        SurfaceFormat::Bgrx8 => data
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], 0xFF])
            .collect(),
        SurfaceFormat::Bgr8 => data
            .chunks_exact(3)
            .flat_map(|p| [p[2], p[1], p[0]])
            .collect(),
    };

    Ok(DecodedImage {
        data: pixels,
        width,
        height,
        stride: width as usize * bpp,
        format: pixel_format,
    })
}

/// Decode block-compressed data tile by tile, keeping the first `bpp`
/// channels of every pixel that falls inside the image.
fn decode_blocks(
    data: &[u8],
    width: u32,
    height: u32,
    block_size: usize,
    bpp: usize,
    decode_tile: fn(&[u8], &mut [u8]),
) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let blocks_x = width.div_ceil(4).max(1);
    let mut output = vec![0u8; width * height * bpp];
    let mut tile: Tile = [0u8; 64];

    for (index, block) in data.chunks_exact(block_size).enumerate() {
        let block_x = (index % blocks_x) * 4;
        let block_y = (index / blocks_x) * 4;
        decode_tile(block, &mut tile);

        for ty in 0..4 {
            let y = block_y + ty;
            if y >= height {
                break;
            }
            for tx in 0..4 {
                let x = block_x + tx;
                if x >= width {
                    break;
                }
                let src = (ty * 4 + tx) * 4;
                let dst = (y * width + x) * bpp;
                output[dst..dst + bpp].copy_from_slice(&tile[src..src + bpp]);
            }
        }
    }

    output
}

/// Expand an 8-byte BC4 block into 16 values.
fn decode_bc4_values(block: &[u8]) -> [u8; 16] {
    let (a0, a1) = (block[0] as u32, block[1] as u32);
    let mut palette = [0u8; 8];
    palette[0] = a0 as u8;
    palette[1] = a1 as u8;

    if a0 > a1 {
        for i in 1..7u32 {
            palette[i as usize + 1] = ((a0 * (7 - i) + a1 * i) / 7) as u8;
        }
    } else {
        for i in 1..5u32 {
            palette[i as usize + 1] = ((a0 * (5 - i) + a1 * i) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 0xFF;
    }

    let bits = block[2..8]
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | (b as u64) << (8 * i));

    let mut values = [0u8; 16];
    for (i, value) in values.iter_mut().enumerate() {
        *value = palette[((bits >> (3 * i)) & 0x7) as usize];
    }
    values
}

fn decode_bc4_tile(block: &[u8], tile: &mut [u8]) {
    let red = decode_bc4_values(&block[..8]);
    for (pixel, r) in tile.chunks_exact_mut(4).zip(red) {
        pixel.copy_from_slice(&[r, r, r, 0xFF]);
    }
}

fn decode_bc5_tile(block: &[u8], tile: &mut [u8]) {
    let red = decode_bc4_values(&block[..8]);
    let green = decode_bc4_values(&block[8..16]);
    for ((pixel, r), g) in tile.chunks_exact_mut(4).zip(red).zip(green) {
        pixel.copy_from_slice(&[r, g, 0, 0xFF]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DdsPixelFormat;
    use zerocopy::IntoBytes;

    /// Build a DDS file around `surface`.
    fn build_dds(
        width: u32,
        height: u32,
        pixel_format: DdsPixelFormat,
        dx10_format: Option<u32>,
        surface: &[u8],
    ) -> Vec<u8> {
        let header = DdsHeader {
            size: DdsHeader::SIZE,
            flags: 0x1007,
            height,
            width,
            pitch_or_linear_size: 0,
            depth: 0,
            mipmap_count: 1,
            reserved1: [0; 11],
            pixel_format,
            caps: 0x1000,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        };

        let mut data = DDS_MAGIC.to_vec();
        data.extend_from_slice(header.as_bytes());
        if let Some(dxgi_format) = dx10_format {
            let ext = DdsHeaderDxt10 {
                dxgi_format,
                resource_dimension: 3,
                misc_flag: 0,
                array_size: 1,
                misc_flags2: 0,
            };
            data.extend_from_slice(ext.as_bytes());
        }
        data.extend_from_slice(surface);
        data
    }

    fn four_cc_format(code: &[u8; 4]) -> DdsPixelFormat {
        DdsPixelFormat {
            size: 32,
            flags: DdsPixelFormat::FOURCC,
            four_cc: crate::header::FourCC(*code),
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        }
    }

    fn rgb_format(bits: u32, masks: [u32; 4], flags: u32) -> DdsPixelFormat {
        DdsPixelFormat {
            size: 32,
            flags,
            four_cc: crate::header::FourCC([0; 4]),
            rgb_bit_count: bits,
            r_bit_mask: masks[0],
            g_bit_mask: masks[1],
            b_bit_mask: masks[2],
            a_bit_mask: masks[3],
        }
    }

    #[test]
    fn test_decode_bc1_white() {
        // color0 = white, color1 = black, every index selects color0.
        let block = [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let dds = build_dds(4, 4, four_cc_format(b"DXT1"), None, &block);

        let image = decode_dds(&dds).unwrap();
        assert_eq!(image.format, PixelFormat::Rgba32);
        assert_eq!((image.width, image.height, image.stride), (4, 4, 16));
        assert!(image.data.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_decode_bc1_clips_partial_tiles() {
        let block = [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let dds = build_dds(2, 3, four_cc_format(b"DXT1"), None, &block);

        let image = decode_dds(&dds).unwrap();
        assert_eq!(image.data.len(), 2 * 3 * 4);
        assert_eq!(image.stride, 8);
    }

    #[test]
    fn test_decode_bc4_gray() {
        // Every index 0 selects the first endpoint.
        let block = [200, 100, 0, 0, 0, 0, 0, 0];
        let dds = build_dds(4, 4, four_cc_format(b"ATI1"), None, &block);

        let image = decode_dds(&dds).unwrap();
        assert_eq!(image.format, PixelFormat::Rgb8);
        assert_eq!(image.data, vec![200; 16]);
    }

    #[test]
    fn test_bc4_palette_modes() {
        // Index 1 everywhere: 0b001 repeated.
        let mut block = [0u8; 8];
        block[0] = 10;
        block[1] = 70;
        let bits: u64 = (0..16).fold(0, |acc, i| acc | 1 << (3 * i));
        block[2..8].copy_from_slice(&bits.to_le_bytes()[..6]);
        assert_eq!(decode_bc4_values(&block), [70; 16]);

        // Index 7 in six-value mode is full intensity.
        let bits: u64 = (0..16).fold(0, |acc, i| acc | 7 << (3 * i));
        block[2..8].copy_from_slice(&bits.to_le_bytes()[..6]);
        assert_eq!(decode_bc4_values(&block), [0xFF; 16]);

        // Index 2 in eight-value mode interpolates 6/7 of the way to a0.
        block[0] = 70;
        block[1] = 0;
        let bits: u64 = (0..16).fold(0, |acc, i| acc | 2 << (3 * i));
        block[2..8].copy_from_slice(&bits.to_le_bytes()[..6]);
        assert_eq!(decode_bc4_values(&block), [60; 16]);
    }

    #[test]
    fn test_decode_bgra_swizzle() {
        let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000];
        let pf = rgb_format(32, masks, DdsPixelFormat::RGB | DdsPixelFormat::ALPHA_PIXELS);
        let dds = build_dds(2, 1, pf, None, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let image = decode_dds(&dds).unwrap();
        assert_eq!(image.format, PixelFormat::Rgba32);
        assert_eq!(image.data, vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_decode_bgrx_forces_opaque() {
        let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0];
        let pf = rgb_format(32, masks, DdsPixelFormat::RGB);
        let dds = build_dds(1, 1, pf, None, &[1, 2, 3, 0]);

        assert_eq!(decode_dds(&dds).unwrap().data, vec![3, 2, 1, 0xFF]);
    }

    #[test]
    fn test_decode_bgr24() {
        let masks = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0];
        let pf = rgb_format(24, masks, DdsPixelFormat::RGB);
        let dds = build_dds(1, 2, pf, None, &[1, 2, 3, 4, 5, 6]);

        let image = decode_dds(&dds).unwrap();
        assert_eq!(image.format, PixelFormat::Rgb24);
        assert_eq!(image.stride, 3);
        assert_eq!(image.data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_decode_dx10_rgba() {
        let pf = four_cc_format(b"DX10");
        let dds = build_dds(1, 1, pf, Some(crate::header::dxgi::R8G8B8A8_UNORM), &[9, 8, 7, 6]);

        assert_eq!(decode_dds(&dds).unwrap().data, vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_unsupported_dxgi_format() {
        // DXGI_FORMAT_R32G32B32A32_FLOAT
        let dds = build_dds(1, 1, four_cc_format(b"DX10"), Some(2), &[0; 16]);
        assert!(matches!(decode_dds(&dds), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_truncated_surface() {
        let dds = build_dds(8, 8, four_cc_format(b"DXT5"), None, &[0; 16]);
        assert!(matches!(
            decode_dds(&dds),
            Err(Error::TruncatedSurface {
                expected: 64,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        let pf = four_cc_format(b"DX10");
        let dds = build_dds(1 << 31, 1 << 31, pf, Some(crate::header::dxgi::R8G8B8A8_UNORM), &[]);
        assert!(matches!(decode_dds(&dds), Err(Error::InvalidHeader(_))));

        let dds = build_dds(u32::MAX, u32::MAX, four_cc_format(b"DXT1"), None, &[]);
        assert!(matches!(decode_dds(&dds), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_decode_surface_checks_length() {
        assert!(matches!(
            decode_surface(SurfaceFormat::Bgr8, &[0; 5], 2, 1),
            Err(Error::TruncatedSurface { expected: 6, actual: 5 })
        ));
        let image = decode_surface(SurfaceFormat::L8, &[7; 6], 2, 2).unwrap();
        assert_eq!(image.data, vec![7; 4]);
    }

    #[test]
    fn test_invalid_magic() {
        let mut dds = build_dds(1, 1, four_cc_format(b"DXT1"), None, &[0; 8]);
        dds[..4].copy_from_slice(b"EDDS");
        assert!(matches!(decode_dds(&dds), Err(Error::InvalidMagic(_))));
        assert!(matches!(decode_dds(b"DD"), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_packed_rows_strips_padding() {
        let image = DecodedImage {
            data: vec![1, 2, 0, 3, 4, 0],
            width: 2,
            height: 2,
            stride: 3,
            format: PixelFormat::Rgb8,
        };
        assert_eq!(image.packed_rows(), vec![1, 2, 3, 4]);
    }
}
