//! Partition-quality metrics.
//!
//! Given a normalized composition matrix and a partition into K groups, six
//! statistics describe how well the grouping explains the data:
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | `rs` | percent of total inequality explained by the groups |
//! | `tineq` | total inequality |
//! | `bineq` | between-group inequality |
//! | `sst` | total sum of squares |
//! | `sse` | within-group sum of squares |
//! | `ch` | Calinski-Harabasz pseudo-F (may be `+inf`) |
//!
//! # Examples
//!
//! ```
//! use entropymax::metrics::compute_metrics;
//! use entropymax::partition::Partition;
//! use entropymax::preprocessing::normalize;
//! use entropymax::primitives::Matrix;
//!
//! let raw = Matrix::from_vec(4, 3, vec![
//!     10.0, 0.0, 0.0,
//!     0.0, 10.0, 0.0,
//!     10.0, 0.0, 0.0,
//!     0.0, 10.0, 0.0,
//! ]).unwrap();
//! let partition = Partition::new(vec![0, 1, 0, 1], 2).unwrap();
//! let record = compute_metrics(&normalize(&raw), &partition).unwrap();
//!
//! assert!((record.rs - 100.0).abs() < 1e-9);
//! assert_eq!(record.sse, 0.0);
//! assert_eq!(record.ch, f64::INFINITY);
//! ```

mod entropy;
mod variance;

pub use entropy::{between_inequality, percent_explained, total_inequality, TotalInequality};
pub use variance::{calinski_harabasz, single_group_ch, sum_of_squares, SumOfSquares};

use crate::error::{EntropyMaxError, Result};
use crate::format::json;
use crate::partition::Partition;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Slack allowed when checking `bineq <= tineq`, relative to `tineq`.
const DECOMPOSITION_SLACK: f64 = 1e-9;

/// The six reported statistics, in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Percent explained (Rs)
    PercentExplained,
    /// Total inequality
    TotalInequality,
    /// Between-group inequality
    BetweenInequality,
    /// Total sum of squares
    TotalSumOfSquares,
    /// Within-group sum of squares
    WithinSumOfSquares,
    /// Calinski-Harabasz pseudo-F
    CalinskiHarabasz,
}

impl MetricName {
    /// Every metric, in the column order used by reported pages.
    pub const ALL: [MetricName; 6] = [
        MetricName::PercentExplained,
        MetricName::TotalInequality,
        MetricName::BetweenInequality,
        MetricName::TotalSumOfSquares,
        MetricName::WithinSumOfSquares,
        MetricName::CalinskiHarabasz,
    ];

    /// Column header used in reported pages.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            MetricName::PercentExplained => "% explained",
            MetricName::TotalInequality => "Total inequality",
            MetricName::BetweenInequality => "Between region inequality",
            MetricName::TotalSumOfSquares => "Total sum of squares",
            MetricName::WithinSumOfSquares => "Within group sum of squares",
            MetricName::CalinskiHarabasz => "Calinski-Harabasz pseudo-F statistic",
        }
    }

    /// Short label for terminal output.
    #[must_use]
    pub fn short(self) -> &'static str {
        match self {
            MetricName::PercentExplained => "Rs",
            MetricName::TotalInequality => "tineq",
            MetricName::BetweenInequality => "bineq",
            MetricName::TotalSumOfSquares => "SST",
            MetricName::WithinSumOfSquares => "SSE",
            MetricName::CalinskiHarabasz => "CH",
        }
    }

    /// Looks a metric up by its page header.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|m| m.header() == header)
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The six statistics for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Total inequality.
    #[serde(with = "json::float")]
    pub tineq: f64,
    /// Between-group inequality.
    #[serde(with = "json::float")]
    pub bineq: f64,
    /// Percent explained, `100 · bineq / tineq`.
    #[serde(with = "json::float")]
    pub rs: f64,
    /// Total sum of squares.
    #[serde(with = "json::float")]
    pub sst: f64,
    /// Within-group sum of squares.
    #[serde(with = "json::float")]
    pub sse: f64,
    /// Calinski-Harabasz pseudo-F; `+inf` under perfect separation.
    #[serde(with = "json::float")]
    pub ch: f64,
}

impl MetricsRecord {
    /// Value of one metric.
    #[must_use]
    pub fn get(&self, metric: MetricName) -> f64 {
        match metric {
            MetricName::PercentExplained => self.rs,
            MetricName::TotalInequality => self.tineq,
            MetricName::BetweenInequality => self.bineq,
            MetricName::TotalSumOfSquares => self.sst,
            MetricName::WithinSumOfSquares => self.sse,
            MetricName::CalinskiHarabasz => self.ch,
        }
    }

    /// Builds a record from values in [`MetricName::ALL`] order.
    #[must_use]
    pub fn from_ordered(values: [f64; 6]) -> Self {
        let [rs, tineq, bineq, sst, sse, ch] = values;
        Self {
            tineq,
            bineq,
            rs,
            sst,
            sse,
            ch,
        }
    }
}

/// Computes all six statistics for `partition` on an already normalized
/// matrix.
///
/// A single-group partition has no between-group structure and a CH
/// statistic with zero degrees of freedom; it is recorded through
/// [`single_group_ch`] (`0` with residual spread, `+inf` without).
///
/// # Errors
///
/// Returns `DimensionMismatch` if the partition does not cover every row.
pub fn compute_metrics(data: &Matrix<f64>, partition: &Partition) -> Result<MetricsRecord> {
    let TotalInequality {
        column_totals,
        tineq,
    } = total_inequality(data);
    let bineq = between_inequality(data, &column_totals, partition)?;
    let rs = percent_explained(tineq, bineq);

    if bineq < -DECOMPOSITION_SLACK * tineq.max(1.0)
        || bineq > tineq + DECOMPOSITION_SLACK * tineq.max(1.0)
    {
        warn!(k = partition.k(), tineq, bineq, "between-group inequality outside [0, tineq]");
    }

    let ss = sum_of_squares(data, partition)?;
    let ch = match calinski_harabasz(ss, data.n_rows(), partition.k()) {
        Ok(ch) => ch,
        Err(EntropyMaxError::InvalidGroupCount { k, .. }) => {
            debug!(k, "CH undefined for a single group, using the degenerate ladder");
            single_group_ch(ss, data.n_rows())
        }
        Err(e) => return Err(e),
    };

    Ok(MetricsRecord {
        tineq,
        bineq,
        rs,
        sst: ss.sst,
        sse: ss.sse,
        ch,
    })
}

#[cfg(test)]
#[path = "tests_record.rs"]
mod tests;
