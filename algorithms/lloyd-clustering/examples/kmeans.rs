use std::fs::File;

use lloyd::traits::Fit;
use lloyd::traits::Predict;
use lloyd::DatasetBase;
use lloyd_clustering::KMeans;
use lloyd_datasets::{generate, write_labeled_csv};
use ndarray::{array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// A routine K-means task: build a synthetic dataset, fit the algorithm on it
// and save the training data with the predicted cluster of every point.
fn main() {
    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    // For each our expected centroids, generate `n` data points around it (a "blob")
    let expected_centroids = array![[10., 10.], [1., 12.], [20., 30.], [-20., 30.],];
    let n = 10000;
    let dataset = DatasetBase::from(generate::blobs(n, &expected_centroids, &mut rng));

    // Configure our training algorithm
    let n_clusters = expected_centroids.len_of(Axis(0));
    let model = KMeans::params_with_rng(n_clusters, rng)
        .n_iterations(200)
        .n_runs(4)
        .fit(&dataset)
        .expect("KMeans fitted");
    println!("inertia: {}", model.inertia());
    println!("centroids:\n{:.3}", model.centroids());

    // Assign each point to a cluster using the set of centroids found using `fit`
    let dataset = model.predict(dataset);

    // Save to disk our dataset (and the cluster label assigned to each observation)
    let file = File::create("clustered_dataset.csv").expect("Failed to create .csv file");
    write_labeled_csv(file, &dataset).expect("Failed to write .csv file");
}
