//! Descriptive statistics for composition matrices.
//!
//! - Kahan compensated summation, used wherever a long run of small
//!   percentages is accumulated
//! - Per-bin means and sample standard deviations
//! - Per-group profiles with Z statistics against the whole population
//!
//! # Examples
//!
//! ```
//! use entropymax::primitives::Matrix;
//! use entropymax::stats::means_sd;
//!
//! let data = Matrix::from_vec(3, 2, vec![1.0, 10.0, 2.0, 10.0, 3.0, 10.0]).expect("valid matrix dimensions");
//! let moments = means_sd(&data);
//! assert!((moments.means[0] - 2.0).abs() < 1e-12);
//! assert!((moments.std_devs[0] - 1.0).abs() < 1e-12);
//! assert_eq!(moments.std_devs[1], 0.0);
//! ```

mod profile;

pub use profile::{group_profiles, GroupProfile};

use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Kahan summation.
///
/// Carries a compensation term so that the low-order bits dropped by each
/// addition are fed back into the next one.
#[must_use]
pub fn kahan_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut c = 0.0;
    for &v in values {
        let y = v - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }
    sum
}

/// Per-bin location and spread of a matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMoments {
    /// Mean of each bin across all samples.
    pub means: Vec<f64>,
    /// Sample standard deviation (denominator `n - 1`) of each bin.
    pub std_devs: Vec<f64>,
}

/// Computes per-bin means and sample standard deviations.
///
/// The variance is computed as `(Σx² - n·mean²) / (n - 1)`; when rounding
/// drives that negative it is clamped to zero before the square root.
/// With fewer than two samples every deviation is zero, and an empty matrix
/// has zero means.
#[must_use]
pub fn means_sd(data: &Matrix<f64>) -> ColumnMoments {
    let (n, m) = data.shape();
    if n == 0 {
        return ColumnMoments {
            means: vec![0.0; m],
            std_devs: vec![0.0; m],
        };
    }

    let nf = n as f64;
    let means: Vec<f64> = data.column_sums().into_iter().map(|s| s / nf).collect();

    let mut sum_sq = vec![0.0; m];
    for row in data.rows() {
        for (acc, &v) in sum_sq.iter_mut().zip(row) {
            *acc += v * v;
        }
    }

    let std_devs = if n < 2 {
        vec![0.0; m]
    } else {
        sum_sq
            .iter()
            .zip(&means)
            .map(|(&sq, &mean)| {
                let var = (sq - nf * mean * mean) / (nf - 1.0);
                var.max(0.0).sqrt()
            })
            .collect()
    };

    ColumnMoments { means, std_devs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kahan_sum_recovers_small_terms() {
        let mut values = vec![1.0e16];
        values.extend(std::iter::repeat(1.0).take(1000));
        values.push(-1.0e16);
        assert_eq!(kahan_sum(&values), 1000.0);
    }

    #[test]
    fn test_kahan_sum_empty() {
        assert_eq!(kahan_sum(&[]), 0.0);
    }

    #[test]
    fn test_means_sd_known_values() {
        let data = Matrix::from_vec(4, 1, vec![2.0, 4.0, 4.0, 6.0]).expect("valid matrix dimensions");
        let moments = means_sd(&data);
        assert!((moments.means[0] - 4.0).abs() < 1e-12);
        // Σ(x - 4)² = 8, / 3
        assert!((moments.std_devs[0] - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_means_sd_single_row_has_zero_spread() {
        let data = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).expect("valid matrix dimensions");
        let moments = means_sd(&data);
        assert_eq!(moments.means, vec![1.0, 2.0, 3.0]);
        assert_eq!(moments.std_devs, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_means_sd_constant_column_never_negative() {
        let data = Matrix::from_vec(3, 1, vec![0.1, 0.1, 0.1]).expect("valid matrix dimensions");
        let moments = means_sd(&data);
        assert!(moments.std_devs[0] >= 0.0);
        assert!(moments.std_devs[0] < 1e-7);
    }

    #[test]
    fn test_means_sd_empty() {
        let data = Matrix::zeros(0, 2);
        let moments = means_sd(&data);
        assert_eq!(moments.means, vec![0.0, 0.0]);
    }
}
