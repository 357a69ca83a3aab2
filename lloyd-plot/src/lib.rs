//! Rendering and command line plumbing for the `lloyd` tools.
//!
//! * `lloyd-cluster` reads points from CSV, fits K-Means and writes the labeled points as CSV
//! * `lloyd-scatter` draws a labeled CSV file as a PNG scatter plot
//! * `lloyd-elbow` fits a range of cluster counts and plots every fit and the inertia curve
//!
//! Plots only contain markers and lines, no text.
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use lloyd_datasets::{CsvError, Points};
use structopt::StructOpt;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod palette;
mod render;

pub use palette::Palette;
pub use render::*;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("can only plot two dimensional points, found {0} features")]
    Dimensions(usize),
    #[error("expected one label per point, found {n_labels} labels for {n_points} points")]
    LabelCount { n_points: usize, n_labels: usize },
    #[error("label {label} is out of range for {n_points} points")]
    LabelOutOfRange { label: usize, n_points: usize },
    #[error("nothing to plot")]
    Empty,
    #[error("unknown palette {0:?}, expected set1 or tab20")]
    UnknownPalette(String),
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Where the tools write their files
#[derive(Debug, Clone, StructOpt)]
pub struct OutputConfig {
    /// Output directory, created when missing
    #[structopt(short = "w", long = "work-dir", env = "WD", parse(from_os_str))]
    pub work_dir: PathBuf,
}

impl OutputConfig {
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        OutputConfig {
            work_dir: work_dir.into(),
        }
    }

    /// Creates the output directory and returns the path of `file_name` inside it
    pub fn output_path<P: AsRef<Path>>(&self, file_name: P) -> Result<PathBuf, PlotError> {
        fs::create_dir_all(&self.work_dir)?;
        Ok(self.work_dir.join(file_name))
    }
}

/// Reads the selected columns of a CSV file, or of stdin when no file is given.
///
/// Files ending in `.gz` are decompressed.
pub fn read_points(input: Option<&Path>, columns: &[usize]) -> Result<Points, CsvError> {
    match input {
        Some(path) if path.extension().map_or(false, |ext| ext == "gz") => {
            lloyd_datasets::points_from_gz_csv(File::open(path)?, columns)
        }
        Some(path) => lloyd_datasets::points_from_csv(File::open(path)?, columns),
        None => lloyd_datasets::points_from_csv(io::stdin().lock(), columns),
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and `info` when unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
