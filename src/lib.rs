//! `lloyd` provides the shared vocabulary of a small, from-scratch K-Means toolkit.
//!
//! The algorithm itself lives in `lloyd-clustering`, loading and writing points in
//! `lloyd-datasets` and rendering in `lloyd-plot`. This crate ties them together with:
//!
//! * [`DatasetBase`], a record matrix paired with optional targets and feature names;
//! * the [`Float`] bound every algorithm is generic over (implemented for `f32` and `f64`);
//! * the [`Fit`](traits::Fit), [`Predict`](traits::Predict) and
//!   [`Transformer`](traits::Transformer) traits;
//! * [`ParamGuard`], which validates a set of hyperparameters before they are used;
//! * the common [`Error`](error::Error) type.
//!

pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{DatasetBase, Float};
pub use param_guard::ParamGuard;
