//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use entropymax::prelude::*;
//! ```

pub use crate::data::{BinLabel, CompositionTable, SampleIndex};
pub use crate::error::{EntropyMaxError, Result};
pub use crate::format::{read_composition, read_composition_path, read_pages, read_pages_path, PageSet};
pub use crate::metrics::{compute_metrics, MetricName, MetricsRecord};
pub use crate::partition::{Assignment, Partition};
pub use crate::preprocessing::{normalize, GrandTotalPercent, Normalization, RowProportion};
pub use crate::primitives::Matrix;
pub use crate::traits::Transformer;
pub use crate::validation::{Discrepancy, Tolerance, ValidationConfig, Validator, Verdict};
