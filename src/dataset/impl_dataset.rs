use super::{DatasetBase, Float, Records};
use crate::error::{Error, Result};
use crate::traits::{Predict, PredictInplace};
use ndarray::{Array2, ArrayBase, ArrayView2, Data, Dimension, Ix2};

impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the records of a dataset
    ///
    /// This function overwrites the records in a dataset. Feature names are dropped because the
    /// new records may describe different features.
    pub fn with_records<U: Records>(self, records: U) -> DatasetBase<U, T> {
        DatasetBase {
            records,
            targets: self.targets,
            feature_names: Vec::new(),
        }
    }

    /// Updates the targets of a dataset
    pub fn with_targets<U>(self, targets: U) -> DatasetBase<R, U> {
        DatasetBase {
            records: self.records,
            targets,
            feature_names: self.feature_names,
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance. Unnamed features are called `feature-{i}`.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T> DatasetBase<ArrayBase<D, Ix2>, T> {
    /// Creates a view of the records without copying them
    pub fn view(&self) -> DatasetBase<ArrayView2<'_, F>, &T> {
        DatasetBase {
            records: self.records.view(),
            targets: &self.targets,
            feature_names: self.feature_names.clone(),
        }
    }
}

impl<F: Float> DatasetBase<Array2<F>, ()> {
    /// Build a dataset without targets from a list of rows
    ///
    /// Every row must have the same number of features as the first one, otherwise
    /// `Error::DimensionMismatch` names the first offending row. An empty list yields an empty
    /// `(0, 0)` dataset.
    pub fn from_rows<S: AsRef<[F]>>(rows: &[S]) -> Result<Self> {
        let nfeatures = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * nfeatures);

        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != nfeatures {
                return Err(Error::DimensionMismatch {
                    row: idx,
                    expected: nfeatures,
                    found: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        let records = Array2::from_shape_vec((rows.len(), nfeatures), flat)?;

        Ok(DatasetBase::from(records))
    }
}

impl<F: Float, D: Data<Elem = F>> From<ArrayBase<D, Ix2>> for DatasetBase<ArrayBase<D, Ix2>, ()> {
    fn from(records: ArrayBase<D, Ix2>) -> Self {
        DatasetBase {
            records,
            targets: (),
            feature_names: Vec::new(),
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T> From<(ArrayBase<D, Ix2>, T)>
    for DatasetBase<ArrayBase<D, Ix2>, T>
{
    fn from(rec_tar: (ArrayBase<D, Ix2>, T)) -> Self {
        DatasetBase {
            records: rec_tar.0,
            targets: rec_tar.1,
            feature_names: Vec::new(),
        }
    }
}

/// Predict on a dataset, consuming it and attaching the predictions as its targets
impl<D: Data, T, S, O> Predict<DatasetBase<ArrayBase<D, Ix2>, T>, DatasetBase<ArrayBase<D, Ix2>, S>>
    for O
where
    O: PredictInplace<ArrayBase<D, Ix2>, S>,
{
    fn predict(&self, ds: DatasetBase<ArrayBase<D, Ix2>, T>) -> DatasetBase<ArrayBase<D, Ix2>, S> {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        ds.with_targets(targets)
    }
}

/// Predict on a borrowed dataset, returning only the predictions
impl<'a, D: Data, T, S, O> Predict<&'a DatasetBase<ArrayBase<D, Ix2>, T>, S> for O
where
    O: PredictInplace<ArrayBase<D, Ix2>, S>,
{
    fn predict(&self, ds: &'a DatasetBase<ArrayBase<D, Ix2>, T>) -> S {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        targets
    }
}

/// Predict on borrowed records of any dimensionality
impl<'a, D: Data, DM: Dimension, S, O> Predict<&'a ArrayBase<D, DM>, S> for O
where
    O: PredictInplace<ArrayBase<D, DM>, S>,
{
    fn predict(&self, records: &'a ArrayBase<D, DM>) -> S {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}
