use crate::k_means::errors::{KMeansError, KMeansParamsError};
use crate::k_means::init::validate_observations;
use crate::k_means::{KMeansParams, KMeansValidParams};
use lloyd::{prelude::*, DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide the _standard algorithm_ (also known as Lloyd's Algorithm) with a fixed
/// iteration budget. More details on the algorithm can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/K-means_clustering).
///
/// ## Standard algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms,
///   K-means++ by default;
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum squared euclidean distance between the observation and the
///                    cluster's centroid, ties go to the lowest cluster index);
/// - update step: recompute the centroid of each cluster as the mean of its members.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated exactly `n_iterations` times; there is no tolerance
/// based early stop.
///
/// A cluster that ends up without members during an assignment step keeps its previous
/// centroid. It is not reseeded, and it may win members back in a later iteration.
///
/// ## Tutorial
///
/// Let's do a walkthrough of a training-predict example.
///
/// ```
/// use lloyd::DatasetBase;
/// use lloyd::traits::{Fit, Predict};
/// use lloyd_clustering::KMeans;
/// use lloyd_datasets::generate;
/// use ndarray::{Axis, array};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let seed = 42;
/// let mut rng = Xoshiro256Plus::seed_from_u64(seed);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let data = generate::blobs(100, &expected_centroids, &mut rng);
/// let n_clusters = expected_centroids.len_of(Axis(0));
///
/// let observations = DatasetBase::from(data);
/// // Let's configure and run our K-means algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `n_clusters` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `n_runs`, `n_iterations`)
/// // default values will be used.
/// let model = KMeans::params_with_rng(n_clusters, rng.clone())
///     .n_iterations(50)
///     .n_runs(3)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Every observation belongs to exactly one cluster
/// let n_members: usize = model.clusters().iter().map(|c| c.len()).sum();
/// assert_eq!(n_members, 300);
///
/// // Once we found our set of centroids, we can also assign new points to the nearest cluster
/// let new_observation = DatasetBase::from(array![[-9., 20.5]]);
/// // Predict returns the **index** of the nearest cluster
/// let dataset = model.predict(new_observation);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = &model.centroids().index_axis(Axis(0), dataset.targets()[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), array![-10., 20.], epsilon = 1e-1);
/// ```
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    memberships: Array1<usize>,
    clusters: Vec<Vec<usize>>,
    inertia: F,
}

impl<F: Float> KMeans<F> {
    pub fn params(nclusters: usize) -> KMeansParams<F, Xoshiro256Plus> {
        KMeansParams::new(nclusters, Xoshiro256Plus::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng>(nclusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(nclusters, rng)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the number of clusters
    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    /// Return, for every training point, the index of the cluster it was assigned to
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    /// Return the indices of the training points belonging to each cluster, in ascending order.
    ///
    /// There is one entry per cluster; clusters without members have an empty list.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> Array1<usize> {
        self.clusters.iter().map(|members| members.len()).collect()
    }

    /// Return the sum of squared distances between each training point and the centroid of
    /// its cluster.
    pub fn inertia(&self) -> F {
        self.inertia
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T> Fit<ArrayBase<DA, Ix2>, T, KMeansError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// The generator held by the hyperparameters is cloned, so fitting twice with the same
    /// hyperparameters yields the same model.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, KMeansError> {
        let mut rng = self.rng().clone();
        let observations = dataset.records().view();
        validate_observations(self.n_clusters(), &observations)?;

        let mut best: Option<KMeans<F>> = None;
        for n_run in 0..self.n_runs() {
            let centroids =
                self.init_method()
                    .run(self.n_clusters(), observations.view(), &mut rng)?;
            let model = lloyd_iterations(centroids, &observations, self.n_iterations());
            debug!(run = n_run, inertia = %model.inertia, "k-means run finished");

            // We keep the model which minimizes the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations)
            // over the n runs of the KMeans algorithm.
            if best
                .as_ref()
                .map_or(true, |best| model.inertia < best.inertia)
            {
                best = Some(model);
            }
        }

        let model = best.ok_or(KMeansError::InvalidConfiguration(KMeansParamsError::NRuns))?;
        let n_empty = model.clusters.iter().filter(|c| c.is_empty()).count();
        if n_empty > 0 {
            warn!(
                n_empty,
                n_clusters = self.n_clusters(),
                "fitted model has clusters without members"
            );
        }
        info!(
            n_clusters = self.n_clusters(),
            n_observations = observations.nrows(),
            n_iterations = self.n_iterations(),
            inertia = %model.inertia,
            "k-means fitted"
        );
        Ok(model)
    }
}

/// Runs the assignment and update steps `n_iterations` times starting from `centroids`.
///
/// The returned groupings come from the last assignment step and the inertia is measured
/// against the centroids produced by the last update step. Without iterations, a single
/// assignment against the initial centroids is performed.
fn lloyd_iterations<F: Float>(
    mut centroids: Array2<F>,
    observations: &ArrayView2<F>,
    n_iterations: u64,
) -> KMeans<F> {
    let n_clusters = centroids.nrows();
    let mut memberships = Array1::zeros(observations.nrows());
    let mut dists = Array1::zeros(observations.nrows());

    if n_iterations == 0 {
        update_cluster_memberships(&centroids, observations, &mut memberships);
    }
    for n_iter in 0..n_iterations {
        update_memberships_and_dists(&centroids, observations, &mut memberships, &mut dists);
        let clusters = group_memberships(&memberships, n_clusters);
        let n_empty = update_centroids(&mut centroids, observations, &clusters);
        debug!(
            iteration = n_iter,
            assignment_inertia = %dists.sum(),
            n_empty,
            "k-means iteration"
        );
    }

    let clusters = group_memberships(&memberships, n_clusters);
    let inertia = compute_inertia(&centroids, observations, &memberships);
    KMeans {
        centroids,
        memberships,
        clusters,
        inertia,
    }
}

impl<F: Float, DA: Data<Elem = F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>> for KMeans<F> {
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(&self.centroids, &observations.view(), &mut dists);
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, memberships: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );

        update_cluster_memberships(&self.centroids, &observations.view(), memberships);
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix1>, usize> for KMeans<F> {
    /// Given one input observation, return the index of its closest cluster
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, membership: &mut usize) {
        *membership = closest_centroid(&self.centroids, observation).0;
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

/// Collects the observation indices of every cluster, in ascending order.
///
/// The result always has `n_clusters` entries, empty clusters included.
fn group_memberships(
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
    n_clusters: usize,
) -> Vec<Vec<usize>> {
    let mut clusters = vec![Vec::new(); n_clusters];
    for (idx, &membership) in cluster_memberships.iter().enumerate() {
        clusters[membership].push(idx);
    }
    clusters
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps `n_iterations` times.
///
/// `update_centroids` moves the centroid of every cluster with members to the mean of those
/// members. Centroids of empty clusters are left untouched.
///
/// Returns the number of empty clusters.
fn update_centroids<F: Float>(
    // (n_clusters, n_features)
    centroids: &mut Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    clusters: &[Vec<usize>],
) -> usize {
    let mut n_empty = 0;
    for (mut centroid, members) in centroids.rows_mut().into_iter().zip(clusters) {
        if members.is_empty() {
            n_empty += 1;
            continue;
        }
        centroid.fill(F::zero());
        for &idx in members {
            centroid += &observations.row(idx);
        }
        centroid /= F::cast(members.len());
    }
    n_empty
}

/// Sum of the squared distances between every observation and the centroid of its cluster
fn compute_inertia<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> F {
    let mut inertia = F::zero();
    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &membership| {
            inertia += squared_distance(&centroids.row(membership), &observation);
        });
    inertia
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(centroids, &observation).0
        });
}

// Updates `dists` with the squared distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .for_each(|observation, dist| *dist = closest_centroid(centroids, &observation).1);
}

// Efficient combination of `update_cluster_memberships` and `update_min_dists`.
pub(crate) fn update_memberships_and_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .and(dists)
        .for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// together with the squared distance to it.
///
/// Ties are resolved in favour of the centroid with the lowest index.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let mut iterator = centroids.rows().into_iter().enumerate();

    let (mut closest_index, mut minimum_distance) = match iterator.next() {
        Some((_, first_centroid)) => (0, squared_distance(&first_centroid, observation)),
        None => return (0, F::infinity()),
    };

    for (centroid_index, centroid) in iterator {
        let distance = squared_distance(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

fn squared_distance<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    let mut sum = F::zero();
    Zip::from(a).and(b).for_each(|&x, &y| {
        let diff = x - y;
        sum += diff * diff;
    });
    sum
}

#[cfg(test)]
mod tests {
    use super::super::KMeansInit;
    use super::*;
    use approx::assert_abs_diff_eq;
    use lloyd_datasets::generate;
    use ndarray::{array, concatenate, Array, Array1, Array2, Axis};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    fn function_test_1d(x: &Array2<f64>) -> Array2<f64> {
        let mut y = Array2::zeros(x.dim());
        Zip::from(&mut y).and(x).for_each(|yi, &xi| {
            if xi < 0.4 {
                *yi = xi * xi;
            } else if (0.4..0.8).contains(&xi) {
                *yi = 3. * xi + 1.;
            } else {
                *yi = f64::sin(10. * xi);
            }
        });
        y
    }

    fn test_data() -> Array2<f64> {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array::random_using(100, Uniform::new(0., 1.0), &mut rng).insert_axis(Axis(1));
        let yt = function_test_1d(&xt);
        concatenate(Axis(1), &[xt.view(), yt.view()]).unwrap()
    }

    macro_rules! calc_inertia {
        ($centroids:expr, $obs:expr, $memberships:expr) => {
            $obs.rows()
                .into_iter()
                .zip($memberships.iter())
                .map(|(row, &c)| squared_distance(&row, &$centroids.row(c)))
                .sum::<f64>()
        };
    }

    macro_rules! calc_memberships {
        ($centroids:expr, $obs:expr) => {{
            let mut memberships = Array1::zeros($obs.nrows());
            update_cluster_memberships(&$centroids, &$obs, &mut memberships);
            memberships
        }};
    }

    #[test]
    fn test_min_dists() {
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let mut dists = Array1::zeros(observations.nrows());

        update_min_dists(&centroids, &observations, &mut dists);
        assert_abs_diff_eq!(dists, array![18.0, 5.0, 250.0]);
    }

    #[test]
    fn four_points_two_clusters() {
        let observations = array![[1., 1.], [1., 2.], [9., 9.], [9., 10.]];
        let dataset = DatasetBase::from(observations);
        let model = KMeans::params(2)
            .init_method(KMeansInit::Precomputed(array![[1., 1.], [9., 9.]]))
            .n_iterations(1)
            .fit(&dataset)
            .expect("KMeans fitted");

        assert_eq!(model.clusters(), &[vec![0, 1], vec![2, 3]]);
        assert_eq!(model.memberships(), &array![0, 0, 1, 1]);
        assert_abs_diff_eq!(model.centroids(), &array![[1., 1.5], [9., 9.5]]);
        assert_abs_diff_eq!(model.inertia(), 1.0);
    }

    #[test]
    fn four_points_two_clusters_seeded() {
        let observations = array![[1., 1.], [1., 2.], [9., 9.], [9., 10.]];
        let dataset = DatasetBase::from(observations);

        // whichever points get seeded, one round separates the two pairs
        for seed in 0..20 {
            let model = KMeans::params_with_rng(2, Xoshiro256Plus::seed_from_u64(seed))
                .n_iterations(3)
                .fit(&dataset)
                .expect("KMeans fitted");

            let mut clusters = model.clusters().to_vec();
            clusters.sort();
            assert_eq!(clusters, vec![vec![0, 1], vec![2, 3]]);
            assert_abs_diff_eq!(model.inertia(), 1.0);
        }
    }

    #[test]
    fn test_n_runs() {
        let data = test_data();
        let rng = Xoshiro256Plus::seed_from_u64(42);

        for init in &[KMeansInit::Random, KMeansInit::KMeansPlusPlus] {
            // First clustering with a single run
            let dataset = DatasetBase::from(data.clone());
            let model = KMeans::params_with_rng(3, rng.clone())
                .n_runs(1)
                .init_method(init.clone())
                .fit(&dataset)
                .expect("KMeans fitted");
            let clusters = model.predict(dataset);
            let inertia = calc_inertia!(model.centroids(), clusters.records, clusters.targets);
            let total_dist = model.transform(&clusters.records.view()).sum();
            assert_abs_diff_eq!(inertia, total_dist, epsilon = 1e-5);
            assert_abs_diff_eq!(inertia, model.inertia(), epsilon = 1e-5);

            let single_cluster: usize = model.predict(&data.row(0));
            assert_eq!(single_cluster, clusters.targets[0]);

            // Second clustering with 10 runs, sharing the first run's seed
            let dataset2 = DatasetBase::from(clusters.records().clone());
            let model2 = KMeans::params_with_rng(3, rng.clone())
                .n_runs(10)
                .init_method(init.clone())
                .fit(&dataset2)
                .expect("KMeans fitted");
            let clusters2 = model2.predict(dataset2);
            let inertia2 = calc_inertia!(model2.centroids(), clusters2.records, clusters2.targets);
            let total_dist2 = model2.transform(&clusters2.records.view()).sum();
            assert_abs_diff_eq!(inertia2, total_dist2, epsilon = 1e-5);

            // The first of the ten runs is the single run above
            assert!(model2.inertia() <= model.inertia());
        }
    }

    #[test]
    fn fit_returns_requested_shape() {
        let data = test_data();
        let dataset = DatasetBase::from(data);

        for n_clusters in 1..6 {
            let model = KMeans::params(n_clusters)
                .n_iterations(20)
                .fit(&dataset)
                .expect("KMeans fitted");
            assert_eq!(model.centroids().dim(), (n_clusters, 2));
            assert_eq!(model.clusters().len(), n_clusters);
            assert_eq!(model.memberships().len(), 100);

            // every observation is in exactly one cluster
            let mut seen: Vec<usize> = model.clusters().iter().flatten().copied().collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..100).collect::<Vec<_>>());
            for (cluster, members) in model.clusters().iter().enumerate() {
                assert!(members.iter().all(|&idx| model.memberships()[idx] == cluster));
            }
            assert_eq!(model.cluster_count().sum(), 100);
        }
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let data = test_data();
        let dataset = DatasetBase::from(data.clone());
        let model = KMeans::params(1)
            .n_iterations(1)
            .fit(&dataset)
            .expect("KMeans fitted");

        let mean = data.mean_axis(Axis(0)).unwrap();
        assert_abs_diff_eq!(model.centroids().row(0), mean.view(), epsilon = 1e-12);

        let deviations: f64 = data
            .rows()
            .into_iter()
            .map(|row| squared_distance(&row, &mean))
            .sum();
        assert_abs_diff_eq!(model.inertia(), deviations, epsilon = 1e-9);
    }

    #[test]
    fn one_cluster_per_point() {
        let observations = array![[0., 0.], [5., 1.], [-3., 7.], [2., 2.], [10., -4.]];
        let dataset = DatasetBase::from(observations.clone());
        let model = KMeans::params(5)
            .n_iterations(5)
            .fit(&dataset)
            .expect("KMeans fitted");

        assert_abs_diff_eq!(model.inertia(), 0.0);
        for (idx, observation) in observations.rows().into_iter().enumerate() {
            let cluster = model.memberships()[idx];
            assert_eq!(model.clusters()[cluster], vec![idx]);
            assert_eq!(model.centroids().row(cluster), observation);
        }
    }

    #[test]
    fn inertia_does_not_increase_with_iterations() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5);
        let expected = array![[0., 0.], [4., 4.], [-4., 4.], [0., -5.]];
        let data = generate::blobs(40, &expected, &mut rng);
        let dataset = DatasetBase::from(data);

        for init in &[KMeansInit::Random, KMeansInit::KMeansPlusPlus] {
            let mut previous = f64::INFINITY;
            for n_iterations in 0..12 {
                let model = KMeans::params_with_rng(4, Xoshiro256Plus::seed_from_u64(9))
                    .init_method(init.clone())
                    .n_iterations(n_iterations)
                    .fit(&dataset)
                    .expect("KMeans fitted");
                assert!(model.inertia() >= 0.);
                assert!(
                    model.inertia() <= previous + 1e-9,
                    "inertia went up from {} to {} at {} iterations",
                    previous,
                    model.inertia(),
                    n_iterations
                );
                previous = model.inertia();
            }
        }
    }

    #[test]
    fn fit_is_reproducible() {
        let dataset = DatasetBase::from(test_data());
        let params =
            KMeans::params_with_rng(4, Xoshiro256Plus::seed_from_u64(77)).n_iterations(100);

        let first = params.fit(&dataset).expect("KMeans fitted");
        let second = params.fit(&dataset).expect("KMeans fitted");
        assert_eq!(first, second);

        // refitting from the fitted centroids without iterating changes nothing
        let frozen = KMeans::params(4)
            .init_method(KMeansInit::Precomputed(first.centroids().clone()))
            .n_iterations(0)
            .fit(&dataset)
            .expect("KMeans fitted");
        assert_eq!(frozen.centroids(), first.centroids());
        assert_eq!(frozen.memberships(), first.memberships());
    }

    #[test]
    fn zero_iterations_keep_the_seeds() {
        let observations = array![[0., 0.], [1., 0.], [10., 0.], [11., 0.]];
        let dataset = DatasetBase::from(observations);
        let model = KMeans::params(2)
            .init_method(KMeansInit::Precomputed(array![[0., 0.], [11., 0.]]))
            .n_iterations(0)
            .fit(&dataset)
            .expect("KMeans fitted");

        assert_eq!(model.centroids(), &array![[0., 0.], [11., 0.]]);
        assert_eq!(model.clusters(), &[vec![0, 1], vec![2, 3]]);
        assert_abs_diff_eq!(model.inertia(), 2.0);
    }

    #[test]
    fn empty_cluster_keeps_its_centroid() {
        let observations = array![[0., 0.], [1., 0.], [2., 0.]];
        let dataset = DatasetBase::from(observations);
        // the second centroid is farther from every point than the first one
        let model = KMeans::params(2)
            .init_method(KMeansInit::Precomputed(array![[1., 0.], [100., 100.]]))
            .n_iterations(3)
            .fit(&dataset)
            .expect("KMeans fitted");

        assert_eq!(model.clusters(), &[vec![0, 1, 2], vec![]]);
        assert_eq!(model.centroids(), &array![[1., 0.], [100., 100.]]);
        assert_eq!(model.cluster_count(), array![3, 0]);
        assert_abs_diff_eq!(model.inertia(), 2.0);
    }

    #[test]
    fn update_centroids_freezes_empty_clusters() {
        let observations = array![[1.0, 2.0], [3.0, 4.0]];
        let clusters = vec![vec![0, 1], vec![]];
        let mut centroids = array![[0.0, 0.0], [7.0, 7.0]];
        let n_empty = update_centroids(&mut centroids, &observations, &clusters);

        assert_eq!(n_empty, 1);
        assert_abs_diff_eq!(centroids, array![[2.0, 3.0], [7.0, 7.0]]);
    }

    #[test]
    fn update_centroids_works() {
        let cluster_size = 100;
        let n_features = 4;
        let mut rng = Xoshiro256Plus::seed_from_u64(3);

        // Let's setup a synthetic set of observations, composed of two clusters with known means
        let cluster_1: Array2<f64> =
            Array::random_using((cluster_size, n_features), Uniform::new(-100., 100.), &mut rng);
        let expected_centroid_1 = cluster_1.mean_axis(Axis(0)).unwrap();

        let cluster_2: Array2<f64> =
            Array::random_using((cluster_size, n_features), Uniform::new(-100., 100.), &mut rng);
        let expected_centroid_2 = cluster_2.mean_axis(Axis(0)).unwrap();

        let observations = concatenate(Axis(0), &[cluster_1.view(), cluster_2.view()]).unwrap();
        let clusters = vec![
            (0..cluster_size).collect::<Vec<_>>(),
            (cluster_size..2 * cluster_size).collect(),
        ];

        let mut centroids = Array2::zeros((2, n_features));
        update_centroids(&mut centroids, &observations, &clusters);
        assert_abs_diff_eq!(
            centroids.index_axis(Axis(0), 0),
            expected_centroid_1,
            epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            centroids.index_axis(Axis(0), 1),
            expected_centroid_2,
            epsilon = 1e-5
        );
    }

    #[test]
    fn group_memberships_lists_every_cluster() {
        let memberships = array![2, 0, 2, 2, 0];
        let clusters = group_memberships(&memberships, 4);
        assert_eq!(clusters, vec![vec![1, 4], vec![], vec![0, 2, 3], vec![]]);
    }

    #[test]
    // An observation is closest to itself.
    fn nothing_is_closer_than_self() {
        let n_centroids = 20;
        let n_features = 5;
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids: Array2<f64> = Array::random_using(
            (n_centroids, n_features),
            Uniform::new(-100., 100.),
            &mut rng,
        );

        let expected_memberships = (0..n_centroids).collect::<Array1<_>>();
        assert_eq!(calc_memberships!(centroids, centroids), expected_memberships);
    }

    #[test]
    fn oracle_test_for_closest_centroid() {
        let centroids = array![[0., 0.], [1., 2.], [20., 0.], [0., 20.],];
        let observations = array![[1., 0.6], [20., 2.], [20., 0.], [7., 20.],];
        let memberships = array![0, 2, 2, 3];

        assert_eq!(calc_memberships!(centroids, observations), memberships);
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let centroids = array![[5., 0.], [-1., 0.], [1., 0.]];
        assert_eq!(closest_centroid(&centroids, &array![0., 0.]), (1, 1.));
        assert_eq!(closest_centroid(&centroids, &array![3., 0.]), (0, 4.));
    }

    #[test]
    fn invalid_datasets() {
        let dataset = DatasetBase::from(array![[0., 0.], [1., 1.]]);

        let res = KMeans::params(3).fit(&dataset);
        assert_eq!(
            res,
            Err(KMeansError::InvalidConfiguration(
                KMeansParamsError::TooManyClusters {
                    n_clusters: 3,
                    n_observations: 2
                }
            ))
        );

        let res = KMeans::params(0).fit(&dataset);
        assert_eq!(
            res,
            Err(KMeansError::InvalidConfiguration(
                KMeansParamsError::NClusters
            ))
        );

        let empty = DatasetBase::from(Array2::<f64>::zeros((3, 0)));
        let res = KMeans::params(1).fit(&empty);
        assert_eq!(
            res,
            Err(KMeansError::EmptyInput {
                n_observations: 3,
                n_features: 0
            })
        );
    }

    #[test]
    fn works_with_f32() {
        let dataset = DatasetBase::from(array![[0f32, 0.], [0., 1.], [10., 10.], [10., 11.]]);
        let model = KMeans::params(2)
            .n_iterations(4)
            .fit(&dataset)
            .expect("KMeans fitted");
        assert_abs_diff_eq!(model.inertia(), 1.0f32, epsilon = 1e-6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn model_serde_round_trip() {
        let dataset = DatasetBase::from(test_data());
        let model = KMeans::params(3).fit(&dataset).expect("KMeans fitted");

        let json = serde_json::to_string(&model).unwrap();
        let loaded: KMeans<f64> = serde_json::from_str(&json).unwrap();
        assert_abs_diff_eq!(loaded.centroids(), model.centroids(), epsilon = 1e-10);
        assert_eq!(loaded.clusters(), model.clusters());
    }
}
