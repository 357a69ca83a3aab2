//! Error types in Lloyd
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("dataset is empty: {nsamples} samples with {nfeatures} features")]
    EmptyInput { nsamples: usize, nfeatures: usize },
    #[error("row {row} has {found} features, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
