//! Per-file conversion of EDDS textures to DDS, PNG and TIFF.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use edds_container::{decode_edds, EddsContainer, EDDS_EXTENSION};
use edds_dds::{decode_dds, save_image, OutputFormat};
use glob::MatchOptions;

use crate::Result;

/// Which outputs to produce for every input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Write the reconstructed DDS file.
    pub dds: bool,
    /// Write a PNG of the top mip level.
    pub png: bool,
    /// Write a TIFF of the top mip level.
    pub tiff: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dds: true,
            png: true,
            tiff: true,
        }
    }
}

impl ConvertOptions {
    /// Raster formats enabled by these options.
    pub fn image_formats(&self) -> impl Iterator<Item = OutputFormat> + '_ {
        OutputFormat::ALL.into_iter().filter(move |format| match format {
            OutputFormat::Png => self.png,
            OutputFormat::Tiff => self.tiff,
        })
    }

    /// Whether the DDS surface has to be decoded to pixels.
    pub fn needs_pixels(&self) -> bool {
        self.png || self.tiff
    }

    /// Output kinds enabled by these options, in the order they are written.
    pub fn kinds(&self) -> Vec<OutputKind> {
        let mut kinds = Vec::new();
        if self.dds {
            kinds.push(OutputKind::Dds);
        }
        kinds.extend(self.image_formats().map(OutputKind::Image));
        kinds
    }
}

/// A kind of output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Reconstructed DDS file.
    Dds,
    /// Decoded raster image.
    Image(OutputFormat),
}

impl OutputKind {
    /// Name of the folder this kind is written to.
    pub const fn dir_name(self) -> &'static str {
        self.extension()
    }

    /// File extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Dds => "dds",
            Self::Image(format) => format.extension(),
        }
    }
}

/// Output folder layout: `<root>/dds`, `<root>/png` and `<root>/tif`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create a layout rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Folder for one output kind.
    pub fn dir(&self, kind: OutputKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Output path for `input` converted to `kind`.
    pub fn path_for(&self, input: &Path, kind: OutputKind) -> PathBuf {
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        let mut path = self.dir(kind).join(stem);
        path.set_extension(kind.extension());
        path
    }

    /// Create the folders needed for `options`.
    pub fn create_dirs(&self, options: &ConvertOptions) -> io::Result<()> {
        for kind in options.kinds() {
            fs::create_dir_all(self.dir(kind))?;
        }
        Ok(())
    }
}

/// Convert one EDDS file, returning the paths written in order.
///
/// Everything is decoded before the first file is written, so a failing
/// input leaves no output behind.
pub fn convert_file(
    input: &Path,
    layout: &OutputLayout,
    options: &ConvertOptions,
) -> Result<Vec<PathBuf>> {
    let container = EddsContainer::open(input)?;
    tracing::debug!(
        input = %input.display(),
        blocks = container.blocks().len(),
        dx10 = container.header().is_dx10(),
        "decoded container"
    );

    let dds = container.to_dds();
    let image = if options.needs_pixels() {
        Some(decode_dds(&dds)?)
    } else {
        None
    };

    let mut written = Vec::new();

    if options.dds {
        let path = layout.path_for(input, OutputKind::Dds);
        fs::write(&path, &dds)?;
        written.push(path);
    }

    if let Some(image) = &image {
        for format in options.image_formats() {
            let path = layout.path_for(input, OutputKind::Image(format));
            save_image(image, &path, format)?;
            written.push(path);
        }
    }

    tracing::debug!(input = %input.display(), outputs = written.len(), "converted");
    Ok(written)
}

/// Decode an EDDS file and write the reconstructed DDS to `output`.
pub fn convert_to_dds(input: &Path, output: &Path) -> Result<()> {
    let dds = decode_edds(input)?;
    fs::write(output, dds)?;
    Ok(())
}

/// List the `*.edds` files directly inside `dir`, sorted by path.
pub fn find_edds_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(format!("*.{}", EDDS_EXTENSION));
    let pattern = pattern.to_string_lossy();

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry.map_err(io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
