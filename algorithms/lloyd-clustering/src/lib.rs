//! `lloyd-clustering` provides a pure Rust implementation of K-Means clustering
//! (Lloyd's algorithm) seeded with K-Means++.
//!
//! ## The big picture
//!
//! `lloyd-clustering` is the algorithm crate of the `lloyd` workspace. It builds on the
//! dataset and trait definitions of `lloyd`:
//! * hyperparameters are collected with a builder ([`KMeansParams`]) and validated when fitting;
//! * fitting a [`DatasetBase`](lloyd::DatasetBase) yields a [`KMeans`] model holding the final centroids,
//!   the point groupings and the inertia of the fit;
//! * the model predicts cluster memberships for new observations.
//!
//! [`inertia_curve`] fits one model per cluster count, which is what the elbow method needs
//! to pick `n_clusters`.
//!
//! Implementation choices, algorithmic details and tutorials can be found in the page dedicated
//! to [`KMeans`].
mod k_means;

pub use k_means::*;
