//! PNG and TIFF export of decoded surfaces.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ExtendedColorType;

use crate::decode::DecodedImage;
use crate::format::PixelFormat;
use crate::Result;

/// Raster formats a decoded surface can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Portable Network Graphics.
    Png,
    /// Tagged Image File Format.
    Tiff,
}

impl OutputFormat {
    /// All output formats, in the order they are written.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Tiff];

    /// File extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tif",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

fn color_type(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Rgba32 => ExtendedColorType::Rgba8,
        PixelFormat::Rgb24 => ExtendedColorType::Rgb8,
        PixelFormat::Rgb8 => ExtendedColorType::L8,
    }
}

/// Encode a decoded surface in memory.
pub fn encode_image(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>> {
    let pixels = image.packed_rows();
    let mut cursor = Cursor::new(Vec::new());

    image::write_buffer_with_format(
        &mut cursor,
        &pixels,
        image.width,
        image.height,
        color_type(image.format),
        format.image_format(),
    )?;

    Ok(cursor.into_inner())
}

/// Encode a decoded surface and write it to `path`.
///
/// Nothing is written if encoding fails.
pub fn save_image<P: AsRef<Path>>(image: &DecodedImage, path: P, format: OutputFormat) -> Result<()> {
    let encoded = encode_image(image, format)?;
    fs::write(path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> DecodedImage {
        DecodedImage {
            data: vec![
                0xFF, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, //
                0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x80,
            ],
            width: 2,
            height: 2,
            stride: 8,
            format: PixelFormat::Rgba32,
        }
    }

    #[test]
    fn test_png_roundtrip() {
        let image = checkerboard();
        let png = encode_image(&image, OutputFormat::Png).unwrap();

        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), &image.data);
    }

    #[test]
    fn test_tiff_signature() {
        let tiff = encode_image(&checkerboard(), OutputFormat::Tiff).unwrap();
        assert!(tiff.starts_with(b"II*\0") || tiff.starts_with(b"MM\0*"));
    }

    #[test]
    fn test_gray_png() {
        let image = DecodedImage {
            data: vec![0, 64, 128, 255],
            width: 4,
            height: 1,
            stride: 4,
            format: PixelFormat::Rgb8,
        };
        let png = encode_image(&image, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.as_raw(), &image.data);
    }

    #[test]
    fn test_save_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        save_image(&checkerboard(), &path, OutputFormat::Png).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Tiff.extension(), "tif");
    }
}
