use super::algorithm::update_min_dists;
use super::errors::{KMeansError, KMeansParamsError};
use lloyd::Float;
use ndarray::{s, Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix1};
use ndarray_rand::rand;
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use tracing::debug;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick random points as centroids.
    Random,
    /// Precomputed list of centroids, represented as an array of (n_centroids, n_features).
    Precomputed(Array2<F>),
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
}

impl<F: Float> KMeansInit<F> {
    /// Runs the chosen initialization routine and returns the `(n_clusters, n_features)` matrix of
    /// initial centroids.
    ///
    /// The observations are validated first: they must not be empty, `n_clusters` has to lie in
    /// `1..=n_observations` and precomputed centroids must share the observations' dimensionality.
    /// Randomness is only drawn from `rng`.
    pub fn run<R: Rng>(
        &self,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut R,
    ) -> Result<Array2<F>, KMeansError> {
        validate_observations(n_clusters, &observations)?;

        let centroids = match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_pp(n_clusters, observations, rng),
            Self::Precomputed(centroids) => {
                if centroids.nrows() != n_clusters {
                    return Err(KMeansParamsError::PrecomputedCentroids {
                        n_clusters,
                        n_centroids: centroids.nrows(),
                    }
                    .into());
                }
                if centroids.ncols() != observations.ncols() {
                    return Err(KMeansError::DimensionMismatch {
                        expected: observations.ncols(),
                        found: centroids.ncols(),
                    });
                }
                centroids.clone()
            }
        };
        Ok(centroids)
    }
}

/// Checks that `observations` can be split into `n_clusters` clusters.
pub(crate) fn validate_observations<F: Float>(
    n_clusters: usize,
    observations: &ArrayView2<F>,
) -> Result<(), KMeansError> {
    let (n_observations, n_features) = observations.dim();
    if n_observations == 0 || n_features == 0 {
        return Err(KMeansError::EmptyInput {
            n_observations,
            n_features,
        });
    }
    if n_clusters == 0 {
        return Err(KMeansParamsError::NClusters.into());
    }
    if n_clusters > n_observations {
        return Err(KMeansParamsError::TooManyClusters {
            n_clusters,
            n_observations,
        }
        .into());
    }
    Ok(())
}

fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    debug!(?indices, "random seeding");
    observations.select(Axis(0), &indices)
}

/// Selects centroids from the observations with probability proportional to their squared
/// distance from the centroids chosen so far. The first centroid is drawn uniformly.
fn k_means_pp<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    let n = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(n));
    debug!(index = n, "k-means++ first centroid");

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(
            &centroids.slice(s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );
        let r = rng.gen_range(F::zero()..F::one());
        let centroid_idx = match weighted_pick(&dists, r) {
            Some(idx) => idx,
            // every observation sits on a centroid already
            None => rng.gen_range(0..n_samples),
        };
        debug!(index = centroid_idx, cluster = c_cnt, "k-means++ centroid");
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

/// Walks the cumulative distribution of `weights` in order and returns the first index whose
/// cumulative probability exceeds `r`.
///
/// Weights are divided by their maximum before summing so that large squared distances do not
/// overflow the total. If a weight is infinite itself, only the infinite weights are drawn from,
/// with equal probability.
///
/// If rounding keeps every cumulative probability at or below `r`, the last index with a positive
/// weight is returned. Returns `None` when no weight is positive.
fn weighted_pick<F: Float>(weights: &ArrayBase<impl Data<Elem = F>, Ix1>, r: F) -> Option<usize> {
    let max = weights
        .iter()
        .fold(F::zero(), |max, &weight| if weight > max { weight } else { max });
    if max <= F::zero() {
        return None;
    }

    let scaled = weights.mapv(|weight| {
        if weight.is_nan() || weight <= F::zero() {
            F::zero()
        } else if max.is_infinite() {
            if weight.is_infinite() {
                F::one()
            } else {
                F::zero()
            }
        } else {
            weight / max
        }
    });
    let total = scaled.sum();

    let mut cumulative = F::zero();
    let mut last_positive = None;
    for (idx, &weight) in scaled.iter().enumerate() {
        if weight > F::zero() {
            last_positive = Some(idx);
        }
        cumulative += weight / total;
        if r < cumulative {
            return Some(idx);
        }
    }
    last_positive
}
