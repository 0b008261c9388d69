//! Composition tables and sample lookup.
//!
//! A [`CompositionTable`] is the parsed raw input: one row per sample, one
//! column per size bin. It is built once and never mutated; every metric
//! computation borrows its matrix.
//!
//! Sample identifiers may repeat. [`SampleIndex`] resolves them by position:
//! each name maps to a FIFO queue of the row indices carrying it, in file
//! order.

use crate::error::{EntropyMaxError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A numeric bin header, e.g. a particle diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinLabel {
    /// Header text as it appeared in the file (trimmed).
    pub raw: String,
    /// Parsed numeric value.
    pub value: f64,
}

impl BinLabel {
    /// Parses a header cell.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the header is not a finite number.
    pub fn parse(raw: &str, column: usize) -> Result<Self> {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self {
                raw: raw.to_string(),
                value,
            }),
            _ => Err(EntropyMaxError::malformed(
                format!("header column {}", column + 1),
                format!("bin header '{raw}' is not numeric"),
            )),
        }
    }
}

/// Sample-by-bin composition data with its identifiers.
///
/// # Examples
///
/// ```
/// use entropymax::data::{BinLabel, CompositionTable};
/// use entropymax::primitives::Matrix;
///
/// let bins = vec![BinLabel::parse("0.5", 1).unwrap(), BinLabel::parse("1.0", 2).unwrap()];
/// let matrix = Matrix::from_vec(2, 2, vec![3.0, 1.0, 0.0, 4.0]).unwrap();
/// let table = CompositionTable::new(vec!["A".into(), "B".into()], bins, matrix).unwrap();
/// assert_eq!(table.n_samples(), 2);
/// assert_eq!(table.n_bins(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionTable {
    sample_ids: Vec<String>,
    bin_labels: Vec<BinLabel>,
    matrix: Matrix<f64>,
}

impl CompositionTable {
    /// Creates a table, checking that ids and labels match the matrix and
    /// that every cell is a finite nonnegative number.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when the id or label counts disagree with
    /// the matrix shape, and `MalformedInput` for a negative or non-finite cell.
    pub fn new(sample_ids: Vec<String>, bin_labels: Vec<BinLabel>, matrix: Matrix<f64>) -> Result<Self> {
        let (n, m) = matrix.shape();
        if sample_ids.len() != n {
            return Err(EntropyMaxError::dimension_mismatch("samples", n, sample_ids.len()));
        }
        if bin_labels.len() != m {
            return Err(EntropyMaxError::dimension_mismatch("bins", m, bin_labels.len()));
        }
        for (i, row) in matrix.rows().enumerate() {
            if let Some(j) = row.iter().position(|v| !v.is_finite() || *v < 0.0) {
                return Err(EntropyMaxError::malformed(
                    format!("sample '{}' (row {}), bin '{}'", sample_ids[i], i + 1, bin_labels[j].raw),
                    format!("value {} is not a nonnegative number", row[j]),
                ));
            }
        }
        Ok(Self {
            sample_ids,
            bin_labels,
            matrix,
        })
    }

    /// Sample identifiers in row order.
    #[must_use]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Bin headers in column order.
    #[must_use]
    pub fn bin_labels(&self) -> &[BinLabel] {
        &self.bin_labels
    }

    /// The raw sample-by-bin matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix<f64> {
        &self.matrix
    }

    /// Number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.matrix.n_rows()
    }

    /// Number of bins (columns).
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.matrix.n_cols()
    }

    /// Builds the positional name index for this table.
    #[must_use]
    pub fn sample_index(&self) -> SampleIndex {
        SampleIndex::new(&self.sample_ids)
    }
}

/// Name → FIFO queue of row indices, built once per table.
#[derive(Debug, Clone, Default)]
pub struct SampleIndex {
    queues: HashMap<String, VecDeque<usize>>,
    names: Vec<String>,
}

impl SampleIndex {
    /// Indexes `sample_ids`, preserving row order within each name.
    #[must_use]
    pub fn new(sample_ids: &[String]) -> Self {
        let mut queues: HashMap<String, VecDeque<usize>> = HashMap::new();
        for (i, id) in sample_ids.iter().enumerate() {
            queues.entry(id.clone()).or_default().push_back(i);
        }
        Self {
            queues,
            names: sample_ids.to_vec(),
        }
    }

    /// Number of rows indexed.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.names.len()
    }

    /// Name carried by `row`.
    #[must_use]
    pub fn name(&self, row: usize) -> Option<&str> {
        self.names.get(row).map(String::as_str)
    }

    /// Rows carrying `name`, in file order.
    #[must_use]
    pub fn rows_for(&self, name: &str) -> Option<&VecDeque<usize>> {
        self.queues.get(name)
    }

    /// A fresh consuming view. Each partition page gets its own cursor, so
    /// consumption on one page never affects another.
    #[must_use]
    pub fn cursor(&self) -> SampleCursor<'_> {
        SampleCursor {
            pending: self
                .queues
                .iter()
                .map(|(name, rows)| (name.as_str(), rows.clone()))
                .collect(),
        }
    }
}

/// Consuming view over a [`SampleIndex`].
#[derive(Debug, Clone)]
pub struct SampleCursor<'a> {
    pending: HashMap<&'a str, VecDeque<usize>>,
}

impl SampleCursor<'_> {
    /// Takes the next unused row carrying `name`, or `None` when the name is
    /// unknown or every row with that name has been consumed.
    pub fn take(&mut self, name: &str) -> Option<usize> {
        self.pending.get_mut(name).and_then(VecDeque::pop_front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<BinLabel> {
        raw.iter()
            .enumerate()
            .map(|(j, r)| BinLabel::parse(r, j + 1).expect("numeric label"))
            .collect()
    }

    #[test]
    fn test_bin_label_parse() {
        let label = BinLabel::parse(" 0.375 ", 1).expect("numeric label");
        assert_eq!(label.raw, "0.375");
        assert!((label.value - 0.375).abs() < 1e-15);
    }

    #[test]
    fn test_bin_label_rejects_text() {
        let err = BinLabel::parse("coarse", 4).unwrap_err();
        assert!(err.to_string().contains("header column 5"));
        assert!(err.to_string().contains("coarse"));
    }

    #[test]
    fn test_table_rejects_negative_cell() {
        let matrix = Matrix::from_vec(1, 2, vec![1.0, -0.5]).expect("valid matrix dimensions");
        let err = CompositionTable::new(vec!["S1".into()], labels(&["1", "2"]), matrix).unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("S1"));
    }

    #[test]
    fn test_table_rejects_id_count_mismatch() {
        let matrix = Matrix::zeros(2, 2);
        let err = CompositionTable::new(vec!["S1".into()], labels(&["1", "2"]), matrix).unwrap_err();
        assert!(matches!(err, EntropyMaxError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_sample_index_fifo_order() {
        let ids: Vec<String> = ["A", "B", "A", "C", "A"].iter().map(|s| s.to_string()).collect();
        let index = SampleIndex::new(&ids);
        let mut cursor = index.cursor();
        assert_eq!(cursor.take("A"), Some(0));
        assert_eq!(cursor.take("A"), Some(2));
        assert_eq!(cursor.take("B"), Some(1));
        assert_eq!(cursor.take("A"), Some(4));
        assert_eq!(cursor.take("A"), None);
        assert_eq!(cursor.take("Z"), None);
    }

    #[test]
    fn test_cursors_are_independent() {
        let ids: Vec<String> = ["A", "A"].iter().map(|s| s.to_string()).collect();
        let index = SampleIndex::new(&ids);
        let mut first = index.cursor();
        assert_eq!(first.take("A"), Some(0));
        assert_eq!(first.take("A"), Some(1));
        let mut second = index.cursor();
        assert_eq!(second.take("A"), Some(0));
        assert_eq!(index.rows_for("A").map(VecDeque::len), Some(2));
        assert_eq!(index.name(1), Some("A"));
        assert_eq!(index.name(2), None);
    }
}
