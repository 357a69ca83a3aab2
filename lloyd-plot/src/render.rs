use std::ops::Range;
use std::path::Path;

use ndarray::{Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::{Palette, PlotError};

/// Size of the PNG files, in pixels
pub const PLOT_SIZE: (u32, u32) = (800, 600);

fn drawing<E: std::error::Error>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}

/// Checks that `points` can be drawn as a scatter plot colored by `labels`.
fn check_scatter(
    points: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    labels: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Result<(), PlotError> {
    if points.ncols() != 2 {
        return Err(PlotError::Dimensions(points.ncols()));
    }
    if points.nrows() != labels.len() {
        return Err(PlotError::LabelCount {
            n_points: points.nrows(),
            n_labels: labels.len(),
        });
    }
    if points.nrows() == 0 {
        return Err(PlotError::Empty);
    }
    Ok(())
}

/// Largest coordinate magnitude of a plot, keeps the width of every range finite
const MAX_EXTENT: f64 = f64::MAX / 2.;

/// Range covering `values` with a margin of 5% on each side, clamped to `±MAX_EXTENT`
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
            (min.min(x), max.max(x))
        });
    if min > max {
        return -1.0..1.0;
    }
    let pad = if max > min {
        max * 0.05 - min * 0.05
    } else {
        1.0
    };
    (min - pad).max(-MAX_EXTENT)..(max + pad).min(MAX_EXTENT)
}

/// Mean of the points carrying each label, one row per label from `0` to the largest label.
///
/// Labels without points get a `NaN` row, which is not drawn. Every label has to be below the
/// number of points.
pub fn centroids_from_labels(
    points: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    labels: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Result<Array2<f64>, PlotError> {
    if points.nrows() != labels.len() {
        return Err(PlotError::LabelCount {
            n_points: points.nrows(),
            n_labels: labels.len(),
        });
    }
    let n_clusters = match labels.iter().max() {
        Some(&max) if max >= points.nrows() => {
            return Err(PlotError::LabelOutOfRange {
                label: max,
                n_points: points.nrows(),
            })
        }
        Some(&max) => max + 1,
        None => 0,
    };
    let mut sums = Array2::zeros((n_clusters, points.ncols()));
    let mut counts = vec![0usize; n_clusters];

    for (point, &label) in points.axis_iter(Axis(0)).zip(labels.iter()) {
        let mut sum = sums.row_mut(label);
        sum += &point;
        counts[label] += 1;
    }
    for (mut sum, count) in sums.axis_iter_mut(Axis(0)).zip(counts) {
        sum /= count as f64;
    }
    Ok(sums)
}

/// Draws `points` as dots colored by their cluster label, and `centroids` as black crosses.
///
/// Nothing but the markers is drawn, so the output does not depend on system fonts.
pub fn draw_clusters<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    labels: &ArrayBase<impl Data<Elem = usize>, Ix1>,
    centroids: Option<&ArrayBase<impl Data<Elem = f64>, Ix2>>,
    palette: Palette,
) -> Result<(), PlotError> {
    check_scatter(points, labels)?;
    if let Some(centroids) = centroids {
        if centroids.ncols() != 2 {
            return Err(PlotError::Dimensions(centroids.ncols()));
        }
    }

    let xs = points.column(0);
    let ys = points.column(1);
    let centroid_xs = centroids.into_iter().flat_map(|c| c.column(0).to_vec());
    let centroid_ys = centroids.into_iter().flat_map(|c| c.column(1).to_vec());
    let x_range = padded_range(xs.iter().copied().chain(centroid_xs));
    let y_range = padded_range(ys.iter().copied().chain(centroid_ys));
    debug!(?x_range, ?y_range, n_points = points.nrows(), "drawing clusters");

    root.fill(&WHITE).map_err(drawing)?;
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing)?;

    chart
        .draw_series(
            points
                .axis_iter(Axis(0))
                .zip(labels.iter())
                .map(|(point, &label)| {
                    Circle::new(
                        (point[0], point[1]),
                        4,
                        palette.color(label).mix(0.75).filled(),
                    )
                }),
        )
        .map_err(drawing)?;

    if let Some(centroids) = centroids {
        chart
            .draw_series(
                centroids
                    .axis_iter(Axis(0))
                    .filter(|c| c.iter().all(|x| x.is_finite()))
                    .map(|c| Cross::new((c[0], c[1]), 8, BLACK.stroke_width(3))),
            )
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)?;
    Ok(())
}

/// Renders [`draw_clusters`] into a PNG file at `path`
pub fn plot_clusters(
    path: &Path,
    points: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    labels: &ArrayBase<impl Data<Elem = usize>, Ix1>,
    centroids: Option<&ArrayBase<impl Data<Elem = f64>, Ix2>>,
    palette: Palette,
) -> Result<(), PlotError> {
    // fail before creating an empty file
    check_scatter(points, labels)?;
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    draw_clusters(&root, points, labels, centroids, palette)
}

/// Draws the inertia of every fitted cluster count as a line with a dot per point.
pub fn draw_inertia_curve<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &[(usize, f64)],
) -> Result<(), PlotError> {
    if curve.is_empty() {
        return Err(PlotError::Empty);
    }
    let x_range = padded_range(curve.iter().map(|&(k, _)| k as f64));
    let y_range = padded_range(curve.iter().map(|&(_, inertia)| inertia));

    root.fill(&WHITE).map_err(drawing)?;
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing)?;

    let color = Palette::Set1.color(1);
    chart
        .draw_series(LineSeries::new(
            curve.iter().map(|&(k, inertia)| (k as f64, inertia)),
            color.stroke_width(2),
        ))
        .map_err(drawing)?;
    chart
        .draw_series(
            curve
                .iter()
                .map(|&(k, inertia)| Circle::new((k as f64, inertia), 4, color.filled())),
        )
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Renders [`draw_inertia_curve`] into a PNG file at `path`
pub fn plot_inertia_curve(path: &Path, curve: &[(usize, f64)]) -> Result<(), PlotError> {
    if curve.is_empty() {
        return Err(PlotError::Empty);
    }
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    draw_inertia_curve(&root, curve)
}
