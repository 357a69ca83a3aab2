//! Synthetic point sets with a known cluster structure

use lloyd::{DatasetBase, Float};
use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs<F: Float>(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<F>
where
    StandardNormal: Distribution<F>,
{
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// Each point is its blob centroid plus a noise vector drawn from `distribution`. The rows of
/// blob `i` are `i * blob_size..(i + 1) * blob_size`.
pub fn blobs_with_distribution<F: Float>(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    distribution: impl Distribution<F> + Clone,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_features = blob_centroids.ncols();
    let noise: Array2<F> = Array::random_using(
        (blob_centroids.nrows() * blob_size, n_features),
        distribution,
        rng,
    );

    let mut points = noise;
    for (mut blob, centroid) in points
        .axis_chunks_iter_mut(Axis(0), blob_size.max(1))
        .zip(blob_centroids.rows())
    {
        blob += &centroid;
    }
    points
}

/// Same as `blobs`, with the index of the originating blob as target of every point.
///
/// ```
/// use lloyd_datasets::generate::labeled_blobs;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let dataset = labeled_blobs(3, &array![[0., 0.], [10., 10.]], &mut rng);
///
/// assert_eq!(dataset.targets(), &array![0, 0, 0, 1, 1, 1]);
/// ```
pub fn labeled_blobs<F: Float>(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    rng: &mut impl Rng,
) -> DatasetBase<Array2<F>, Array1<usize>>
where
    StandardNormal: Distribution<F>,
{
    let records = blobs(blob_size, blob_centroids, rng);
    let targets = (0..blob_centroids.nrows() * blob_size)
        .map(|idx| idx / blob_size)
        .collect();
    DatasetBase::new(records, targets)
}
