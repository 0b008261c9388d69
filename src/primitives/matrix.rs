//! Matrix type for 2D numeric data.

use crate::stats::kahan_sum;
use serde::{Deserialize, Serialize};

/// A 2D matrix of values in row-major storage.
///
/// Rows are samples, columns are bins.
///
/// # Examples
///
/// ```
/// use entropymax::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix from equal-length rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are ragged.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, &'static str> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err("All rows must have the same length");
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Returns true when the matrix holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Returns a row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` is out of bounds.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterates rows in order.
    #[must_use]
    pub fn rows(&self) -> Rows<'_, T> {
        Rows {
            matrix: self,
            next: 0,
        }
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Applies `f` to every element, producing a matrix of the same shape.
    #[must_use]
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().copied().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Sum of every cell (Kahan compensated).
    #[must_use]
    pub fn sum(&self) -> f64 {
        kahan_sum(&self.data)
    }

    /// Per-column sums, `Y[j] = Σ_i m[i][j]`.
    #[must_use]
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in self.rows() {
            for (acc, &v) in sums.iter_mut().zip(row) {
                *acc += v;
            }
        }
        sums
    }

    /// Per-row sums.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(kahan_sum).collect()
    }
}

/// Iterator over the rows of a [`Matrix`].
#[derive(Debug, Clone)]
pub struct Rows<'a, T> {
    matrix: &'a Matrix<T>,
    next: usize,
}

impl<'a, T: Copy> Iterator for Rows<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.matrix.rows {
            return None;
        }
        let row = self.matrix.row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.rows - self.next;
        (left, Some(left))
    }
}

impl<T: Copy> ExactSizeIterator for Rows<'_, T> {}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
