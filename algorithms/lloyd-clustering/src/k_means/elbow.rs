use std::ops::RangeInclusive;

use crate::k_means::{KMeans, KMeansError};
use lloyd::{prelude::*, DatasetBase, Float};
use ndarray::{ArrayBase, Data, Ix2};
use ndarray_rand::rand::Rng;
use tracing::info;

/// Fits one K-Means model for every cluster count in `n_clusters`.
///
/// All models share the iteration budget and start from a clone of `rng`, so the curve is
/// reproducible. Plotting `KMeans::inertia` against `KMeans::n_clusters` gives the elbow curve
/// used to pick a cluster count.
///
/// Fails on the first cluster count that cannot be fitted, e.g. when it exceeds the number of
/// observations.
///
/// ```
/// use lloyd::DatasetBase;
/// use lloyd_clustering::inertia_curve;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let dataset = DatasetBase::from(array![[0., 0.], [0., 1.], [8., 8.], [8., 9.], [-5., 4.]]);
/// let models = inertia_curve(&dataset, 1..=5, 10, Xoshiro256Plus::seed_from_u64(1)).unwrap();
///
/// assert_eq!(models.len(), 5);
/// assert_eq!(models[4].inertia(), 0.);
/// ```
pub fn inertia_curve<F: Float, R: Rng + Clone, D: Data<Elem = F>, T>(
    dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    n_clusters: RangeInclusive<usize>,
    n_iterations: u64,
    rng: R,
) -> Result<Vec<KMeans<F>>, KMeansError> {
    n_clusters
        .map(|k| {
            let model: Result<KMeans<F>, KMeansError> = KMeans::params_with_rng(k, rng.clone())
                .n_iterations(n_iterations)
                .fit(dataset);
            let model = model?;
            info!(n_clusters = k, inertia = %model.inertia(), "elbow point");
            Ok(model)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lloyd_datasets::generate;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn curve_has_one_model_per_cluster_count() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let expected = array![[0., 0.], [20., 20.], [-20., 20.]];
        let dataset = DatasetBase::from(generate::blobs(30, &expected, &mut rng));

        let models = inertia_curve(&dataset, 1..=6, 30, rng).unwrap();
        let ks: Vec<usize> = models.iter().map(|m| m.n_clusters()).collect();
        assert_eq!(ks, vec![1, 2, 3, 4, 5, 6]);

        // the elbow: going past the true number of blobs barely helps
        let inertias: Vec<f64> = models.iter().map(|m| m.inertia()).collect();
        assert!(inertias[1] < inertias[0]);
        assert!(inertias[2] < inertias[1]);
        assert!(inertias[0] - inertias[2] > 10. * (inertias[2] - inertias[3]));
    }

    #[test]
    fn curve_is_reproducible() {
        let dataset = DatasetBase::from(array![[0., 0.], [1., 1.], [5., 5.], [6., 5.], [9., 0.]]);
        let rng = Xoshiro256Plus::seed_from_u64(3);

        let first = inertia_curve(&dataset, 1..=4, 5, rng.clone()).unwrap();
        let second = inertia_curve(&dataset, 1..=4, 5, rng).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_abs_diff_eq!(a.inertia(), b.inertia());
            assert_eq!(a.centroids(), b.centroids());
        }
    }

    #[test]
    fn too_many_clusters_stop_the_curve() {
        let dataset = DatasetBase::from(array![[0., 0.], [1., 1.]]);
        let rng = Xoshiro256Plus::seed_from_u64(3);
        assert!(inertia_curve(&dataset, 1..=3, 5, rng).is_err());
    }
}
