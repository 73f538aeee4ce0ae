//! Surface and pixel format dispatch.

use crate::header::{dxgi, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};
use crate::{Error, Result};

/// Layout of the pixel data handed out by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits each of red, green, blue and alpha.
    Rgba32,
    /// 8 bits each of red, green and blue.
    Rgb24,
    /// A single 8-bit channel.
    Rgb8,
}

impl PixelFormat {
    /// Bytes used by one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba32 => 4,
            Self::Rgb24 => 3,
            Self::Rgb8 => 1,
        }
    }
}

/// Storage format of a DDS surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    /// BC1 / DXT1.
    Bc1,
    /// BC2 / DXT2-3.
    Bc2,
    /// BC3 / DXT4-5.
    Bc3,
    /// BC4 unsigned, single channel.
    Bc4,
    /// BC5 unsigned, two channels.
    Bc5,
    /// BC7.
    Bc7,
    /// 32-bit, bytes in R G B A order.
    Rgba8,
    /// 32-bit, bytes in R G B X order.
    Rgbx8,
    /// 32-bit, bytes in B G R A order.
    Bgra8,
    /// 32-bit, bytes in B G R X order.
    Bgrx8,
    /// 24-bit, bytes in B G R order.
    Bgr8,
    /// 8-bit luminance or alpha.
    L8,
}

impl SurfaceFormat {
    /// Work out the surface format from the DDS headers.
    pub fn from_header(header: &DdsHeader, dx10: Option<&DdsHeaderDxt10>) -> Result<Self> {
        if let Some(ext) = dx10 {
            return Self::from_dxgi(ext.dxgi_format);
        }

        let pf = header.pixel_format;
        if pf.has_flag(DdsPixelFormat::FOURCC) {
            return Self::from_four_cc(pf.four_cc);
        }

        let bit_count = pf.rgb_bit_count;
        let masks = (pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask);
        let alpha = pf.has_flag(DdsPixelFormat::ALPHA_PIXELS) && pf.a_bit_mask == 0xFF00_0000;

        if pf.has_flag(DdsPixelFormat::RGB) {
            return match (bit_count, masks) {
                (32, (0x0000_00FF, 0x0000_FF00, 0x00FF_0000)) if alpha => Ok(Self::Rgba8),
                (32, (0x0000_00FF, 0x0000_FF00, 0x00FF_0000)) => Ok(Self::Rgbx8),
                (32, (0x00FF_0000, 0x0000_FF00, 0x0000_00FF)) if alpha => Ok(Self::Bgra8),
                (32, (0x00FF_0000, 0x0000_FF00, 0x0000_00FF)) => Ok(Self::Bgrx8),
                (24, (0x00FF_0000, 0x0000_FF00, 0x0000_00FF)) => Ok(Self::Bgr8),
                (bits, (r, g, b)) => Err(Error::UnsupportedFormat(format!(
                    "{}-bit RGB with masks {:#010x}/{:#010x}/{:#010x}",
                    bits, r, g, b
                ))),
            };
        }

        if pf.has_flag(DdsPixelFormat::LUMINANCE | DdsPixelFormat::ALPHA) && bit_count == 8 {
            return Ok(Self::L8);
        }

        let flags = pf.flags;
        Err(Error::UnsupportedFormat(format!(
            "pixel format flags {:#x} with {} bits per pixel",
            flags, bit_count
        )))
    }

    /// Map a legacy FourCC to a surface format.
    pub fn from_four_cc(four_cc: FourCC) -> Result<Self> {
        match four_cc {
            FourCC::DXT1 => Ok(Self::Bc1),
            FourCC::DXT2 | FourCC::DXT3 => Ok(Self::Bc2),
            FourCC::DXT4 | FourCC::DXT5 => Ok(Self::Bc3),
            FourCC::ATI1 | FourCC::BC4U => Ok(Self::Bc4),
            FourCC::ATI2 | FourCC::BC5U => Ok(Self::Bc5),
            FourCC::DX10 => Err(Error::InvalidHeader(
                "DX10 FourCC without extension header".into(),
            )),
            FourCC(code) => Err(Error::UnsupportedFormat(format!(
                "FourCC {:?}",
                String::from_utf8_lossy(&code)
            ))),
        }
    }

    /// Map a DXGI format from the DX10 header to a surface format.
    pub fn from_dxgi(format: u32) -> Result<Self> {
        match format {
            dxgi::BC1_TYPELESS | dxgi::BC1_UNORM | dxgi::BC1_UNORM_SRGB => Ok(Self::Bc1),
            dxgi::BC2_TYPELESS | dxgi::BC2_UNORM | dxgi::BC2_UNORM_SRGB => Ok(Self::Bc2),
            dxgi::BC3_TYPELESS | dxgi::BC3_UNORM | dxgi::BC3_UNORM_SRGB => Ok(Self::Bc3),
            dxgi::BC4_TYPELESS | dxgi::BC4_UNORM => Ok(Self::Bc4),
            dxgi::BC5_TYPELESS | dxgi::BC5_UNORM => Ok(Self::Bc5),
            dxgi::BC7_TYPELESS | dxgi::BC7_UNORM | dxgi::BC7_UNORM_SRGB => Ok(Self::Bc7),
            dxgi::R8G8B8A8_TYPELESS | dxgi::R8G8B8A8_UNORM | dxgi::R8G8B8A8_UNORM_SRGB => {
                Ok(Self::Rgba8)
            }
            dxgi::B8G8R8A8_TYPELESS | dxgi::B8G8R8A8_UNORM | dxgi::B8G8R8A8_UNORM_SRGB => {
                Ok(Self::Bgra8)
            }
            dxgi::B8G8R8X8_TYPELESS | dxgi::B8G8R8X8_UNORM | dxgi::B8G8R8X8_UNORM_SRGB => {
                Ok(Self::Bgrx8)
            }
            dxgi::R8_TYPELESS | dxgi::R8_UNORM | dxgi::A8_UNORM => Ok(Self::L8),
            other => Err(Error::UnsupportedFormat(format!("DXGI format {}", other))),
        }
    }

    /// Bytes per 4x4 block, for block-compressed formats.
    pub const fn block_size(self) -> Option<usize> {
        match self {
            Self::Bc1 | Self::Bc4 => Some(8),
            Self::Bc2 | Self::Bc3 | Self::Bc5 | Self::Bc7 => Some(16),
            _ => None,
        }
    }

    /// Bytes per pixel as stored, for uncompressed formats.
    pub const fn stored_pixel_size(self) -> Option<usize> {
        match self {
            Self::Rgba8 | Self::Rgbx8 | Self::Bgra8 | Self::Bgrx8 => Some(4),
            Self::Bgr8 => Some(3),
            Self::L8 => Some(1),
            _ => None,
        }
    }

    /// The pixel layout this surface decodes to.
    pub const fn pixel_format(self) -> PixelFormat {
        match self {
            Self::Bc4 | Self::L8 => PixelFormat::Rgb8,
            Self::Bc5 | Self::Bgr8 => PixelFormat::Rgb24,
            _ => PixelFormat::Rgba32,
        }
    }

    /// Size in bytes of a `width` x `height` surface.
    ///
    /// Dimensions whose size does not fit in `usize` are an invalid header.
    pub fn surface_size(self, width: u32, height: u32) -> Result<usize> {
        let (width, height) = (width as usize, height as usize);
        let size = match (self.block_size(), self.stored_pixel_size()) {
            (Some(block), _) => {
                let blocks_x = width.div_ceil(4).max(1);
                let blocks_y = height.div_ceil(4).max(1);
                blocks_x
                    .checked_mul(blocks_y)
                    .and_then(|blocks| blocks.checked_mul(block))
            }
            (None, Some(pixel)) => width
                .checked_mul(height)
                .and_then(|pixels| pixels.checked_mul(pixel)),
            (None, None) => Some(0),
        };
        size.ok_or_else(|| too_large(width, height))
    }

    /// Size in bytes of the decoded `width` x `height` pixels.
    pub fn decoded_size(self, width: u32, height: u32) -> Result<usize> {
        let (width, height) = (width as usize, height as usize);
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(self.pixel_format().bytes_per_pixel()))
            .ok_or_else(|| too_large(width, height))
    }
}

fn too_large(width: usize, height: usize) -> Error {
    Error::InvalidHeader(format!("surface {}x{} is too large", width, height))
}
