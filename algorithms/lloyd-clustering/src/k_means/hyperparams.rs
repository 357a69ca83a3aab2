use crate::KMeansParamsError;

use super::init::KMeansInit;
use lloyd::prelude::*;
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [K-means algorithm](crate::KMeans).
pub struct KMeansValidParams<F: Float, R: Rng> {
    /// Number of times the k-means algorithm will be run with different centroid seeds.
    n_runs: usize,
    /// Number of assignment/update rounds performed after seeding. There is no early stop.
    n_iterations: u64,
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// The initialization strategy used to initialize the centroids.
    init: KMeansInit<F>,
    /// The random number generator
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](KMeansValidParams) for
/// the [K-means algorithm](crate::KMeans) (using the builder pattern).
pub struct KMeansParams<F: Float, R: Rng>(KMeansValidParams<F, R>);

impl<F: Float, R: Rng> KMeansParams<F, R> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training dataset;
    /// * after seeding, the assignment and update steps are repeated exactly
    ///   `n_iterations` times;
    /// * as KMeans depends on centroids initialization we run the algorithm
    ///   `n_runs` times and keep the run with the lowest inertia (the sum of
    ///   squared euclidean distances to the closest centroid for all observations).
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `n_iterations = 150`
    /// * `n_runs = 1`
    /// * `init = KMeansPlusPlus`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(KMeansValidParams {
            n_runs: 1,
            n_iterations: 150,
            n_clusters,
            init: KMeansInit::KMeansPlusPlus,
            rng,
        })
    }

    /// Change the value of `n_runs`
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Change the value of `n_iterations`
    pub fn n_iterations(mut self, n_iterations: u64) -> Self {
        self.0.n_iterations = n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: KMeansInit<F>) -> Self {
        self.0.init = init;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for KMeansParams<F, R> {
    type Checked = KMeansValidParams<F, R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(KMeansParamsError::NClusters)
        } else if self.0.n_runs == 0 {
            Err(KMeansParamsError::NRuns)
        } else if let KMeansInit::Precomputed(centroids) = &self.0.init {
            if centroids.nrows() != self.0.n_clusters {
                Err(KMeansParamsError::PrecomputedCentroids {
                    n_clusters: self.0.n_clusters,
                    n_centroids: centroids.nrows(),
                })
            } else {
                Ok(&self.0)
            }
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    /// The final results will be the best output of n_runs consecutive runs in terms of inertia.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// Number of assignment/update rounds performed by every run.
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// The number of clusters we will be looking for in the training dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster initialization strategy
    pub fn init_method(&self) -> &KMeansInit<F> {
        &self.init
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }
}
