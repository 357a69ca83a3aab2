use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("cannot find {n_clusters} clusters in {n_observations} observations")]
    TooManyClusters {
        n_clusters: usize,
        n_observations: usize,
    },
    #[error("{n_centroids} precomputed centroids given for {n_clusters} clusters")]
    PrecomputedCentroids {
        n_clusters: usize,
        n_centroids: usize,
    },
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value, or ask for more clusters than
    /// there are observations
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] KMeansParamsError),
    /// When the dataset has no observations or no features
    #[error("Empty input: {n_observations} observations with {n_features} features")]
    EmptyInput {
        n_observations: usize,
        n_features: usize,
    },
    /// When the observations, or the precomputed centroids, do not share one dimensionality
    #[error("Dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error(transparent)]
    LloydError(lloyd::error::Error),
}

impl From<lloyd::error::Error> for KMeansError {
    fn from(err: lloyd::error::Error) -> Self {
        match err {
            lloyd::error::Error::EmptyInput {
                nsamples,
                nfeatures,
            } => KMeansError::EmptyInput {
                n_observations: nsamples,
                n_features: nfeatures,
            },
            lloyd::error::Error::DimensionMismatch {
                expected, found, ..
            } => KMeansError::DimensionMismatch { expected, found },
            err => KMeansError::LloydError(err),
        }
    }
}
