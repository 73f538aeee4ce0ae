//! edds2image - Command-line tool converting EDDS textures to DDS, PNG and TIFF.
//!
//! This is the main entry point for the edds2image command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use edds::prelude::*;

/// edds2image - convert Enfusion EDDS textures to DDS, PNG and TIFF
#[derive(Parser)]
#[command(name = "edds2image")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan for .edds files
    #[arg(env = "EDDS_INPUT_DIR", default_value = ".")]
    input: PathBuf,

    /// Root directory for the dds/, png/ and tif/ folders (defaults to the input directory)
    #[arg(short, long, env = "EDDS_OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Do not write reconstructed DDS files
    #[arg(long)]
    no_dds: bool,

    /// Do not write PNG images
    #[arg(long)]
    no_png: bool,

    /// Do not write TIFF images
    #[arg(long)]
    no_tif: bool,

    /// Convert files in parallel
    #[arg(short, long)]
    parallel: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            dds: !self.no_dds,
            png: !self.no_png,
            tiff: !self.no_tif,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd_convert(&cli)
}

fn cmd_convert(cli: &Cli) -> Result<()> {
    let options = cli.options();
    if options.kinds().is_empty() {
        anyhow::bail!("Nothing to do: every output kind is disabled");
    }

    let files = find_edds_files(&cli.input)
        .with_context(|| format!("Failed to scan {}", cli.input.display()))?;

    if files.is_empty() {
        println!("No .edds file found.");
        return Ok(());
    }

    let layout = OutputLayout::new(cli.output.as_deref().unwrap_or(cli.input.as_path()));
    layout
        .create_dirs(&options)
        .context("Failed to create output directories")?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let convert = |input: &PathBuf| -> bool {
        let ok = convert_one(input, &layout, &options, &pb);
        pb.inc(1);
        ok
    };

    let converted = if cli.parallel {
        files.par_iter().map(convert).filter(|&ok| ok).count()
    } else {
        files.iter().map(convert).filter(|&ok| ok).count()
    };
    let failed = files.len() - converted;

    pb.finish_and_clear();
    println!(
        "Converted {} files in {:?} ({} errors)",
        converted,
        start.elapsed(),
        failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} files failed to convert", failed, files.len());
    }

    Ok(())
}

/// Convert one file, reporting outputs and errors through the progress bar.
fn convert_one(
    input: &Path,
    layout: &OutputLayout,
    options: &ConvertOptions,
    pb: &ProgressBar,
) -> bool {
    match convert_file(input, layout, options) {
        Ok(outputs) => {
            for output in outputs {
                pb.suspend(|| println!("{} -> {}", input.display(), output.display()));
            }
            true
        }
        Err(e) => {
            tracing::debug!(input = %input.display(), error = ?e, "conversion failed");
            pb.suspend(|| eprintln!("Error converting {}: {}", input.display(), e));
            false
        }
    }
}
