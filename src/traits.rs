//! Core traits shared by preprocessing steps.

use crate::error::Result;
use crate::primitives::Matrix;

/// Trait for data transformers (normalizers).
///
/// # Examples
///
/// ```
/// use entropymax::prelude::*;
/// use entropymax::preprocessing::GrandTotalPercent;
///
/// let raw = Matrix::from_vec(2, 2, vec![1.0, 1.0, 1.0, 1.0]).unwrap();
/// let mut scaler = GrandTotalPercent::new();
/// let pct = scaler.fit_transform(&raw).unwrap();
/// assert!((pct.get(0, 0) - 25.0).abs() < 1e-12);
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted or the shape is wrong.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntropyMaxError;

    struct Doubler {
        fitted: bool,
    }

    impl Transformer for Doubler {
        fn fit(&mut self, _x: &Matrix<f64>) -> Result<()> {
            self.fitted = true;
            Ok(())
        }

        fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
            if !self.fitted {
                return Err(EntropyMaxError::Other("not fitted".into()));
            }
            Ok(x.map(|v| v * 2.0))
        }
    }

    #[test]
    fn test_fit_transform_default_calls_fit_first() {
        let x = Matrix::from_vec(1, 2, vec![1.0, 2.0]).expect("valid matrix dimensions");
        let mut t = Doubler { fitted: false };
        assert!(t.transform(&x).is_err());
        let out = t.fit_transform(&x).expect("fitted transformer");
        assert_eq!(out.row(0), &[2.0, 4.0]);
    }
}
