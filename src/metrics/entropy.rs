//! Information-theoretic inequality decomposition.
//!
//! For every bin `j` with mass `Y[j]`, the inequality of that mass across
//! samples is `Σ_i (v/Y[j]) · log2(N·v/Y[j])`. Weighting each bin by `Y[j]`
//! and summing gives the total inequality. Replacing samples by groups
//! (group share `yr`, group size `nr`) gives the part of that inequality the
//! grouping explains.

use crate::error::{EntropyMaxError, Result};
use crate::partition::Partition;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Column totals and total inequality of a matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalInequality {
    /// `Y[j] = Σ_i data[i][j]`.
    pub column_totals: Vec<f64>,
    /// Σ_j Y[j] · Σ_i (v/Y[j]) · log2(N·v/Y[j]).
    pub tineq: f64,
}

/// Computes column totals and the total inequality.
///
/// Cells with `v <= 0` and bins with `Y[j] <= 0` contribute nothing.
///
/// # Examples
///
/// ```
/// use entropymax::metrics::total_inequality;
/// use entropymax::primitives::Matrix;
///
/// // Mass spread evenly across samples: no inequality
/// let even = Matrix::from_vec(2, 2, vec![25.0, 25.0, 25.0, 25.0]).unwrap();
/// assert_eq!(total_inequality(&even).tineq, 0.0);
///
/// // All of bin 0 in one sample
/// let skewed = Matrix::from_vec(2, 1, vec![50.0, 0.0]).unwrap();
/// assert!((total_inequality(&skewed).tineq - 50.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn total_inequality(data: &Matrix<f64>) -> TotalInequality {
    let n = data.n_rows() as f64;
    let column_totals = data.column_sums();

    let mut tineq = 0.0;
    for (j, &y) in column_totals.iter().enumerate() {
        if y <= 0.0 {
            continue;
        }
        let mut x = 0.0;
        for row in data.rows() {
            let v = row[j];
            if v > 0.0 {
                x += (v / y) * (n * v / y).log2();
            }
        }
        tineq += y * x;
    }

    TotalInequality {
        column_totals,
        tineq,
    }
}

/// Computes the between-group inequality of `partition` on `data`.
///
/// `column_totals` must be the `Y` returned by [`total_inequality`] for the
/// same matrix.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the partition or the totals do not match
/// the matrix shape.
pub fn between_inequality(
    data: &Matrix<f64>,
    column_totals: &[f64],
    partition: &Partition,
) -> Result<f64> {
    let (n, m) = data.shape();
    if partition.n_samples() != n {
        return Err(EntropyMaxError::dimension_mismatch("partition samples", n, partition.n_samples()));
    }
    if column_totals.len() != m {
        return Err(EntropyMaxError::dimension_mismatch("column totals", m, column_totals.len()));
    }

    let k = partition.k();
    let nr = partition.group_sizes();
    let mut yr = vec![vec![0.0; m]; k];
    for (row, &g) in data.rows().zip(partition.labels()) {
        for (acc, &v) in yr[g].iter_mut().zip(row) {
            *acc += v;
        }
    }

    // Group sums become each group's share of the bin's mass.
    for shares in &mut yr {
        for (share, &y) in shares.iter_mut().zip(column_totals) {
            *share = if y > 0.0 { *share / y } else { 0.0 };
        }
    }

    let nf = n as f64;
    let mut bineq = 0.0;
    for (j, &y) in column_totals.iter().enumerate() {
        if y <= 0.0 {
            continue;
        }
        let mut x = 0.0;
        for (shares, &size) in yr.iter().zip(&nr) {
            let share = shares[j];
            if size == 0 || share <= 0.0 {
                continue;
            }
            x += share * (share * nf / size as f64).log2();
        }
        bineq += y * x;
    }

    Ok(bineq)
}

/// Share of total inequality explained by the grouping, in percent.
///
/// Zero when `tineq <= 0`: the data has no inequality to explain.
#[must_use]
pub fn percent_explained(tineq: f64, bineq: f64) -> f64 {
    if tineq > 0.0 {
        100.0 * bineq / tineq
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tests_entropy.rs"]
mod tests;
