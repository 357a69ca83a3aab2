//! `lloyd-datasets` loads point sets for the `lloyd` clustering workspace and writes
//! clustered points back out.
//!
//! ## The Big Picture
//!
//! Points come from CSV files with a header row. Any numeric columns can be selected as the
//! features of a [`lloyd::DatasetBase`], and the files may be gzip compressed. Clustered points are
//! written as CSV with one extra `label` column holding the cluster index, and that format can
//! be read back with [`labeled_points_from_csv`].
//!
//! ## Current State
//!
//! * [`points_from_csv`] / [`points_from_gz_csv`]: select feature columns by index
//! * [`array_from_csv`] / [`array_from_gz_csv`]: read a whole numeric file
//! * [`labeled_points_from_csv`] and [`write_labeled_csv`]: labeled CSV round trip
//! * [`scale::standardize`]: per-feature z-score scaling
//! * `generate::blobs` (feature `generate`): synthetic clusters for tests and benches
//!
//! ```
//! use lloyd_datasets::points_from_csv;
//!
//! let csv = "id,height,weight\n0,1.5,60\n1,1.8,80\n";
//! let dataset = points_from_csv(csv.as_bytes(), &[1, 2]).unwrap();
//!
//! assert_eq!(dataset.records().dim(), (2, 2));
//! assert_eq!(dataset.feature_names(), vec!["height", "weight"]);
//! ```

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};
use flate2::read::GzDecoder;
use lloyd::{DatasetBase, Float};
use ndarray::prelude::*;
use ndarray::Data;
use ndarray_csv::Array2Reader;
use thiserror::Error;

#[cfg(feature = "generate")]
pub mod generate;
pub mod scale;

/// A set of points without targets, as loaded from CSV
pub type Points = DatasetBase<Array2<f64>, ()>;

/// A set of points with one cluster label per point
pub type LabeledPoints = DatasetBase<Array2<f64>, Array1<usize>>;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Array(#[from] ndarray_csv::ReadError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("row {row} has no column {column}, it only has {n_columns}")]
    MissingColumn {
        row: usize,
        column: usize,
        n_columns: usize,
    },
    #[error("row {row}, column {column}: {value:?} is not a number")]
    NotANumber {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("row {row}: {value} is not a cluster label")]
    InvalidLabel { row: usize, value: f64 },
    #[error("no columns selected")]
    NoColumns,
    #[error("expected one label per point, found {n_labels} labels for {n_points} points")]
    LabelCount { n_points: usize, n_labels: usize },
    #[error(transparent)]
    Lloyd(#[from] lloyd::error::Error),
}

/// Convert Gzipped CSV bytes into 2D array
pub fn array_from_gz_csv<R: Read>(
    gz: R,
    has_headers: bool,
    separator: u8,
) -> Result<Array2<f64>, CsvError> {
    // unzip file
    let file = GzDecoder::new(gz);
    array_from_csv(file, has_headers, separator)
}

/// Convert CSV bytes into 2D array
pub fn array_from_csv<R: Read>(
    csv: R,
    has_headers: bool,
    separator: u8,
) -> Result<Array2<f64>, CsvError> {
    // parse CSV
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(separator)
        .from_reader(csv);

    // extract ndarray
    Ok(reader.deserialize_array2_dynamic()?)
}

/// Read points from a comma separated file with a header row.
///
/// `columns` selects, in order, the columns used as features; their header entries become
/// the feature names. Every row has to contain all selected columns and each selected cell
/// must parse as a number. Other columns are ignored and may hold anything.
pub fn points_from_csv<R: Read>(csv: R, columns: &[usize]) -> Result<Points, CsvError> {
    if columns.is_empty() {
        return Err(CsvError::NoColumns);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv);
    let headers = reader.headers()?.clone();
    let feature_names = columns
        .iter()
        .map(|&column| {
            headers
                .get(column)
                .map(str::to_string)
                .ok_or(CsvError::MissingColumn {
                    row: 0,
                    column,
                    n_columns: headers.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = Vec::new();
    let mut n_rows = 0;
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // the header is row 0
        let row = idx + 1;
        for &column in columns {
            let cell = record.get(column).ok_or(CsvError::MissingColumn {
                row,
                column,
                n_columns: record.len(),
            })?;
            let value = cell.trim().parse::<f64>().map_err(|_| CsvError::NotANumber {
                row,
                column,
                value: cell.to_string(),
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let records = Array2::from_shape_vec((n_rows, columns.len()), values)
        .map_err(lloyd::error::Error::from)?;
    Ok(DatasetBase::from(records).with_feature_names(feature_names))
}

/// Same as [`points_from_csv`] for a gzip compressed file
pub fn points_from_gz_csv<R: Read>(gz: R, columns: &[usize]) -> Result<Points, CsvError> {
    points_from_csv(GzDecoder::new(gz), columns)
}

/// Read points written by [`write_labeled_csv`]: a header row, numeric feature columns and a
/// last column holding the cluster index of every point.
///
/// A cluster index has to be a whole number below the number of points.
pub fn labeled_points_from_csv<R: Read>(csv: R) -> Result<LabeledPoints, CsvError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(csv);
    let headers = reader.headers()?.clone();
    let array: Array2<f64> = reader.deserialize_array2_dynamic()?;

    let n_columns = headers.len();
    if n_columns < 2 {
        return Err(CsvError::MissingColumn {
            row: 0,
            column: 1,
            n_columns,
        });
    }

    let n_points = array.nrows() as f64;
    let labels = array
        .column(n_columns - 1)
        .iter()
        .enumerate()
        .map(|(idx, &value)| {
            if value >= 0. && value < n_points && value.fract() == 0. {
                Ok(value as usize)
            } else {
                Err(CsvError::InvalidLabel {
                    row: idx + 1,
                    value,
                })
            }
        })
        .collect::<Result<Array1<usize>, _>>()?;

    let records = array.slice(s![.., ..n_columns - 1]).to_owned();
    let feature_names = headers.iter().take(n_columns - 1).collect::<Vec<_>>();
    Ok(DatasetBase::new(records, labels).with_feature_names(feature_names))
}

/// Write every point followed by its cluster label as comma separated values.
///
/// The header row holds the feature names of the dataset and `label`.
///
/// ```
/// use lloyd::DatasetBase;
/// use lloyd_datasets::write_labeled_csv;
/// use ndarray::array;
///
/// let dataset = DatasetBase::new(array![[0.5, -1.], [2., 3.]], array![1, 0])
///     .with_feature_names(vec!["x", "y"]);
/// let mut out = Vec::new();
/// write_labeled_csv(&mut out, &dataset).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), "x,y,label\n0.5,-1,1\n2,3,0\n");
/// ```
pub fn write_labeled_csv<W: Write, F: Float, D: Data<Elem = F>, L: Data<Elem = usize>>(
    writer: W,
    dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<L, Ix1>>,
) -> Result<(), CsvError> {
    let (records, labels) = (dataset.records(), dataset.targets());
    if records.nrows() != labels.len() {
        return Err(CsvError::LabelCount {
            n_points: records.nrows(),
            n_labels: labels.len(),
        });
    }

    let mut writer = WriterBuilder::new().from_writer(writer);
    let mut header = dataset.feature_names();
    header.push("label".to_string());
    writer.write_record(&header)?;

    for (point, label) in records.rows().into_iter().zip(labels.iter()) {
        let row = point
            .iter()
            .map(|x| x.to_string())
            .chain(std::iter::once(label.to_string()));
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
