use std::path::PathBuf;

use anyhow::{Context, Result};
use lloyd_datasets::labeled_points_from_csv;
use lloyd_plot::{centroids_from_labels, init_tracing, plot_clusters, OutputConfig, Palette};
use structopt::StructOpt;
use tracing::info;

/// Draws a labeled CSV file, as written by lloyd-cluster, as a PNG scatter plot
#[derive(Debug, StructOpt)]
#[structopt(name = "lloyd-scatter")]
struct ScatterOptions {
    #[structopt(parse(from_os_str))]
    /// Labeled CSV file: two coordinate columns followed by the cluster label
    input: PathBuf,
    #[structopt(flatten)]
    output: OutputConfig,
    #[structopt(short = "o", long = "output")]
    /// Name of the PNG file, defaults to the input file name with a `.png` extension
    file_name: Option<String>,
    #[structopt(short = "p", long = "palette")]
    /// set1 or tab20, picked from the number of clusters when omitted
    palette: Option<Palette>,
    #[structopt(long = "no-centroids")]
    /// Do not mark the mean of every cluster
    no_centroids: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let opt = ScatterOptions::from_args();

    let file = std::fs::File::open(&opt.input)
        .with_context(|| format!("failed to open {}", opt.input.display()))?;
    let dataset = labeled_points_from_csv(file).context("failed to read labeled points")?;

    let centroids = centroids_from_labels(dataset.records(), dataset.targets())
        .context("failed to compute cluster means")?;
    let palette = opt
        .palette
        .unwrap_or_else(|| Palette::for_clusters(centroids.nrows()));
    let file_name = match opt.file_name {
        Some(name) => name,
        None => {
            let stem = opt
                .input
                .file_stem()
                .map_or("clusters".into(), |stem| stem.to_string_lossy());
            format!("{}.png", stem)
        }
    };
    let path = opt.output.output_path(&file_name)?;

    let centroids = if opt.no_centroids {
        None
    } else {
        Some(&centroids)
    };
    plot_clusters(&path, dataset.records(), dataset.targets(), centroids, palette)
        .with_context(|| format!("failed to plot {}", path.display()))?;
    info!(path = %path.display(), %palette, "scatter plot written");
    Ok(())
}
