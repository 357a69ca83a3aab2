use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use lloyd_clustering::inertia_curve;
use lloyd_datasets::scale::standardize;
use lloyd_plot::{
    init_tracing, plot_clusters, plot_inertia_curve, read_points, OutputConfig, Palette,
};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use structopt::StructOpt;
use tracing::info;

/// Fits K-Means for every cluster count up to a maximum, plots each fit as `k_{k}.png`
/// and the inertia of the fits as `inertia.png`
#[derive(Debug, StructOpt)]
#[structopt(name = "lloyd-elbow")]
struct ElbowOptions {
    #[structopt(parse(from_os_str))]
    /// CSV file with a header row. `.gz` files are decompressed
    input: PathBuf,
    #[structopt(flatten)]
    output: OutputConfig,
    #[structopt(short = "c", long = "columns", use_delimiter = true, default_value = "3,4")]
    /// Indices of the two columns holding the coordinates
    columns: Vec<usize>,
    #[structopt(short = "k", long = "max-clusters", default_value = "10")]
    /// Largest number of clusters to fit
    max_clusters: usize,
    #[structopt(short = "i", long = "iterations", default_value = "150")]
    /// Number of assignment/update rounds of every fit
    n_iterations: u64,
    #[structopt(short = "s", long = "seed", default_value = "1")]
    /// Seed of the random generator used for seeding
    seed: u64,
    #[structopt(long = "scale")]
    /// Standardize the coordinates before clustering
    scale: bool,
    #[structopt(short = "p", long = "palette")]
    /// set1 or tab20, picked from the number of clusters when omitted
    palette: Option<Palette>,
}

fn main() -> Result<()> {
    init_tracing();
    let opt = ElbowOptions::from_args();
    ensure!(
        opt.columns.len() == 2,
        "expected two coordinate columns, got {:?}",
        opt.columns
    );
    ensure!(opt.max_clusters > 0, "max-clusters must be at least 1");

    let points = read_points(Some(opt.input.as_path()), &opt.columns)
        .with_context(|| format!("failed to read points from {}", opt.input.display()))?;
    let dataset = if opt.scale {
        standardize(points).context("failed to standardize points")?
    } else {
        points
    };

    let rng = Xoshiro256Plus::seed_from_u64(opt.seed);
    let models = inertia_curve(&dataset, 1..=opt.max_clusters, opt.n_iterations, rng)
        .context("failed to fit K-Means")?;

    println!("k,inertia");
    let mut curve = Vec::with_capacity(models.len());
    for model in &models {
        let k = model.n_clusters();
        let palette = opt.palette.unwrap_or_else(|| Palette::for_clusters(k));
        let path = opt.output.output_path(format!("k_{}.png", k))?;
        plot_clusters(
            &path,
            dataset.records(),
            model.memberships(),
            Some(model.centroids()),
            palette,
        )
        .with_context(|| format!("failed to plot {}", path.display()))?;

        println!("{},{}", k, model.inertia());
        curve.push((k, model.inertia()));
    }

    let path = opt.output.output_path("inertia.png")?;
    plot_inertia_curve(&path, &curve)
        .with_context(|| format!("failed to plot {}", path.display()))?;
    info!(work_dir = %opt.output.work_dir.display(), n_plots = curve.len() + 1, "elbow plots written");
    Ok(())
}
