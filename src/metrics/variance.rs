//! Sum-of-squares decomposition and the Calinski-Harabasz pseudo-F.

use crate::error::{EntropyMaxError, Result};
use crate::partition::Partition;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Total and within-group sums of squared deviations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumOfSquares {
    /// Σ_j Σ_i (x[i][j] - totav[j])², deviations from the grand bin means.
    pub sst: f64,
    /// Σ_j Σ_i (x[i][j] - clav[g(i)][j])², deviations from each sample's
    /// own group mean.
    pub sse: f64,
}

/// Computes SST and SSE for `partition` on `data`.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the partition does not cover every row.
pub fn sum_of_squares(data: &Matrix<f64>, partition: &Partition) -> Result<SumOfSquares> {
    let (n, m) = data.shape();
    if partition.n_samples() != n {
        return Err(EntropyMaxError::dimension_mismatch("partition samples", n, partition.n_samples()));
    }
    if n == 0 {
        return Ok(SumOfSquares { sst: 0.0, sse: 0.0 });
    }

    let nf = n as f64;
    let totav: Vec<f64> = data.column_sums().into_iter().map(|s| s / nf).collect();

    let k = partition.k();
    let mut clsum = vec![vec![0.0; m]; k];
    for (row, &g) in data.rows().zip(partition.labels()) {
        for (acc, &v) in clsum[g].iter_mut().zip(row) {
            *acc += v;
        }
    }
    let clav: Vec<Vec<f64>> = clsum
        .into_iter()
        .zip(partition.group_sizes())
        .map(|(sums, size)| {
            if size == 0 {
                sums
            } else {
                sums.into_iter().map(|s| s / size as f64).collect()
            }
        })
        .collect();

    let mut sst_by_bin = vec![0.0; m];
    let mut sse = 0.0;
    for (row, &g) in data.rows().zip(partition.labels()) {
        for (j, &v) in row.iter().enumerate() {
            sst_by_bin[j] += (v - totav[j]).powi(2);
            sse += (v - clav[g][j]).powi(2);
        }
    }

    Ok(SumOfSquares {
        sst: sst_by_bin.iter().sum(),
        sse,
    })
}

/// Calinski-Harabasz pseudo-F for `n` samples in `k` groups.
///
/// - `r = (SST - SSE) / SST`, or 0 when `SST <= 0`
/// - `r == 1` (perfect separation): `+inf`
/// - otherwise `((SST - SSE) / (k - 1)) / (SSE / (n - k))`, with `+inf`
///   when `n <= k` or the denominator is not positive
///
/// `+inf` is a legitimate result, not a failure.
///
/// # Errors
///
/// Returns `InvalidGroupCount` for `k < 2`, where `k - 1` degrees of
/// freedom leave the statistic undefined.
///
/// # Examples
///
/// ```
/// use entropymax::metrics::{calinski_harabasz, SumOfSquares};
///
/// let ch = calinski_harabasz(SumOfSquares { sst: 337.5, sse: 300.0 }, 4, 2).unwrap();
/// assert!((ch - 0.25).abs() < 1e-12);
///
/// let perfect = calinski_harabasz(SumOfSquares { sst: 10.0, sse: 0.0 }, 4, 2).unwrap();
/// assert_eq!(perfect, f64::INFINITY);
///
/// assert!(calinski_harabasz(SumOfSquares { sst: 10.0, sse: 10.0 }, 4, 1).is_err());
/// ```
pub fn calinski_harabasz(ss: SumOfSquares, n: usize, k: usize) -> Result<f64> {
    if k < 2 {
        return Err(EntropyMaxError::InvalidGroupCount {
            k,
            constraint: "k >= 2 for the Calinski-Harabasz statistic".to_string(),
        });
    }

    let SumOfSquares { sst, sse } = ss;
    let r = if sst > 0.0 { (sst - sse) / sst } else { 0.0 };
    if r == 1.0 {
        return Ok(f64::INFINITY);
    }

    let numerator = (sst - sse) / (k - 1) as f64;
    if n <= k {
        return Ok(f64::INFINITY);
    }
    let denominator = sse / (n - k) as f64;
    if denominator > 0.0 {
        Ok(numerator / denominator)
    } else {
        Ok(f64::INFINITY)
    }
}

/// CH for a one-group page, following the same ladder with a zero
/// numerator in place of the undefined `(SST - SSE) / 0`.
///
/// The result is `0` whenever there is residual spread (`SSE > 0`, `n > 1`)
/// and `+inf` when the rows are indistinguishable. A single sample gives `0`.
#[must_use]
pub fn single_group_ch(ss: SumOfSquares, n: usize) -> f64 {
    let SumOfSquares { sst, sse } = ss;
    let r = if sst > 0.0 { (sst - sse) / sst } else { 0.0 };
    if r == 1.0 {
        return f64::INFINITY;
    }
    if n <= 1 {
        return 0.0;
    }
    if sse / (n - 1) as f64 > 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
#[path = "tests_variance.rs"]
mod tests;
