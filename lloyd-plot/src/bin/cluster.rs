use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use lloyd::traits::{Fit, Predict};
use lloyd_clustering::{KMeans, KMeansError, KMeansInit};
use lloyd_datasets::{scale::standardize, write_labeled_csv};
use lloyd_plot::{init_tracing, read_points};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use structopt::StructOpt;

/// Clusters the points of a CSV file with K-Means and writes them back with their cluster label
#[derive(Debug, StructOpt)]
#[structopt(name = "lloyd-cluster")]
struct ClusterOptions {
    #[structopt(parse(from_os_str))]
    /// CSV file with a header row, stdin when omitted. `.gz` files are decompressed
    input: Option<PathBuf>,
    #[structopt(short = "c", long = "columns", use_delimiter = true, default_value = "0,1")]
    /// Indices of the columns holding the coordinates
    columns: Vec<usize>,
    #[structopt(short = "k", long = "clusters")]
    /// Number of clusters
    n_clusters: usize,
    #[structopt(short = "i", long = "iterations", default_value = "150")]
    /// Number of assignment/update rounds
    n_iterations: u64,
    #[structopt(short = "r", long = "runs", default_value = "1")]
    /// Number of seedings, the fit with the lowest inertia is kept
    n_runs: usize,
    #[structopt(short = "s", long = "seed", default_value = "42")]
    /// Seed of the random generator used for seeding
    seed: u64,
    #[structopt(long = "init", default_value = "kmeans++", possible_values = &["kmeans++", "random"])]
    /// Centroid seeding strategy
    init: String,
    #[structopt(long = "no-scale")]
    /// Cluster the raw coordinates instead of standardized ones
    no_scale: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let opt = ClusterOptions::from_args();

    let init = match opt.init.as_str() {
        "kmeans++" => KMeansInit::KMeansPlusPlus,
        "random" => KMeansInit::Random,
        other => bail!("unknown seeding strategy {}", other),
    };

    let points = read_points(opt.input.as_deref(), &opt.columns).context("failed to read points")?;
    let dataset = if opt.no_scale {
        points
    } else {
        standardize(points).context("failed to standardize points")?
    };

    let model: Result<KMeans<f64>, KMeansError> =
        KMeans::params_with_rng(opt.n_clusters, Xoshiro256Plus::seed_from_u64(opt.seed))
            .n_iterations(opt.n_iterations)
            .n_runs(opt.n_runs)
            .init_method(init)
            .fit(&dataset);
    let model = model.context("failed to fit K-Means")?;

    eprintln!("iterations : {}", opt.n_iterations);
    eprintln!("n          : {}", dataset.records().nrows());
    eprintln!("inertia    : {}", model.inertia());
    for (cluster, count) in model.cluster_count().iter().enumerate() {
        eprintln!("cluster {:<3}: {} points", cluster, count);
    }

    let dataset = model.predict(dataset);
    let stdout = io::stdout();
    write_labeled_csv(stdout.lock(), &dataset).context("failed to write labeled points")?;
    Ok(())
}
