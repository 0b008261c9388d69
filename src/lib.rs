//! EntropyMax: partition-quality metrics for compositional data.
//!
//! Given a sample-by-bin composition table (grain-size distributions, for
//! instance) and a grouping of the samples into K clusters, EntropyMax
//! recomputes the statistics that describe how well the grouping explains
//! the data: total and between-group inequality, percent explained, the
//! total and within-group sums of squares, and the Calinski-Harabasz
//! pseudo-F. The [`validation`] module checks externally reported values
//! against these recomputations.
//!
//! # Quick Start
//!
//! ```
//! use entropymax::prelude::*;
//!
//! let raw = Matrix::from_vec(4, 3, vec![
//!     10.0, 0.0, 0.0,
//!     0.0, 10.0, 0.0,
//!     10.0, 0.0, 0.0,
//!     0.0, 10.0, 0.0,
//! ]).unwrap();
//! let data = GrandTotalPercent::new().fit_transform(&raw).unwrap();
//! let partition = Partition::new(vec![0, 1, 0, 1], 2).unwrap();
//!
//! let record = compute_metrics(&data, &partition).unwrap();
//! assert!((record.rs - 100.0).abs() < 1e-9);
//! assert!(record.ch.is_infinite());
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major `Matrix`
//! - [`data`]: Composition tables and the sample name index
//! - [`preprocessing`]: Grand-total and row normalizers
//! - [`partition`]: Group assignments and page reconstruction
//! - [`metrics`]: Inequality decomposition, sums of squares, CH
//! - [`stats`]: Column moments and per-group Z statistics
//! - [`validation`]: Tolerance comparison of reported pages
//! - [`format`]: CSV readers and JSON helpers

pub mod data;
pub mod error;
pub mod format;
pub mod metrics;
pub mod partition;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod stats;
pub mod traits;
pub mod validation;

pub use error::{EntropyMaxError, Result};
pub use primitives::Matrix;
pub use traits::Transformer;
