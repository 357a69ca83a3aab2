//! Feature scaling

use lloyd::{DatasetBase, Float};
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("cannot scale a dataset without observations")]
    Empty,
    #[error("feature {0} is constant and cannot be standardized")]
    ConstantFeature(usize),
}

/// Scales every feature to zero mean and unit (population) standard deviation.
///
/// Fails when there are no observations or when a feature takes a single value, since it
/// cannot be brought to unit variance. Feature names and targets are kept.
pub fn standardize<F: Float, D: Data<Elem = F>, T>(
    dataset: DatasetBase<ArrayBase<D, Ix2>, T>,
) -> Result<DatasetBase<Array2<F>, T>, ScaleError> {
    let records = dataset.records();
    let mean = records.mean_axis(Axis(0)).ok_or(ScaleError::Empty)?;
    let std = records.std_axis(Axis(0), F::zero());

    if let Some(idx) = std.iter().position(|s| *s == F::zero()) {
        return Err(ScaleError::ConstantFeature(idx));
    }

    let scaled = (records - &mean) / &std;
    let feature_names = dataset.feature_names();
    Ok(dataset
        .with_records(scaled)
        .with_feature_names(feature_names))
}
