//! Normalizers for composition matrices.
//!
//! The metrics engines run on grand-total percentages: every cell divided by
//! the sum of the whole matrix and multiplied by 100. A matrix whose grand
//! total is not positive is degenerate but valid and normalizes to zeros.
//!
//! # Example
//!
//! ```
//! use entropymax::prelude::*;
//! use entropymax::preprocessing::normalize;
//!
//! let raw = Matrix::from_vec(2, 2, vec![
//!     10.0, 30.0,
//!     40.0, 20.0,
//! ]).expect("valid matrix dimensions");
//!
//! let pct = normalize(&raw);
//! assert!((pct.sum() - 100.0).abs() < 1e-12);
//! assert!((pct.get(1, 0) - 40.0).abs() < 1e-12);
//! ```

use crate::error::{EntropyMaxError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Rescales a matrix to percentages of its grand total.
///
/// `out[i][j] = x[i][j] * 100 / grand_total`; all zeros when
/// `grand_total <= 0`.
#[must_use]
pub fn normalize(data: &Matrix<f64>) -> Matrix<f64> {
    percent_of(data, data.sum())
}

fn percent_of(data: &Matrix<f64>, total: f64) -> Matrix<f64> {
    if total <= 0.0 {
        let (n, m) = data.shape();
        return Matrix::zeros(n, m);
    }
    let scale = 100.0 / total;
    data.map(|v| v * scale)
}

/// Grand-total percent normalizer.
///
/// `fit` records the grand total; `transform` scales by it. Fitting on one
/// matrix and transforming another expresses the second in the first's units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrandTotalPercent {
    grand_total: Option<f64>,
}

impl GrandTotalPercent {
    /// Creates an unfitted normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grand total seen during `fit`.
    #[must_use]
    pub fn grand_total(&self) -> Option<f64> {
        self.grand_total
    }

    /// Returns true if the normalizer has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.grand_total.is_some()
    }
}

impl Transformer for GrandTotalPercent {
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        self.grand_total = Some(x.sum());
        Ok(())
    }

    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let total = self
            .grand_total
            .ok_or_else(|| EntropyMaxError::Other("GrandTotalPercent is not fitted".into()))?;
        Ok(percent_of(x, total))
    }
}

/// Rescales every row to percentages of its own row total.
///
/// Rows whose total is not positive become zero rows. Stateless, so `fit`
/// only records the column count to check later inputs against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowProportion {
    n_cols: Option<usize>,
}

impl RowProportion {
    /// Creates an unfitted row normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for RowProportion {
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        self.n_cols = Some(x.n_cols());
        Ok(())
    }

    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let expected = self
            .n_cols
            .ok_or_else(|| EntropyMaxError::Other("RowProportion is not fitted".into()))?;
        if x.n_cols() != expected {
            return Err(EntropyMaxError::dimension_mismatch("bins", expected, x.n_cols()));
        }
        let mut data = Vec::with_capacity(x.as_slice().len());
        for (row, total) in x.rows().zip(x.row_sums()) {
            if total <= 0.0 {
                data.extend(std::iter::repeat(0.0).take(row.len()));
            } else {
                let scale = 100.0 / total;
                data.extend(row.iter().map(|v| v * scale));
            }
        }
        Matrix::from_vec(x.n_rows(), x.n_cols(), data).map_err(EntropyMaxError::from)
    }
}

/// Preprocessing applied to the raw table before metrics are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Percent of the grand total.
    #[default]
    GrandTotal,
    /// Percent of each row's total.
    Row,
    /// Use the raw values as they are.
    None,
}

impl Normalization {
    /// Applies this normalization to `data`.
    ///
    /// # Errors
    ///
    /// Propagates transformer errors.
    pub fn apply(self, data: &Matrix<f64>) -> Result<Matrix<f64>> {
        match self {
            Normalization::GrandTotal => GrandTotalPercent::new().fit_transform(data),
            Normalization::Row => RowProportion::new().fit_transform(data),
            Normalization::None => Ok(data.clone()),
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
