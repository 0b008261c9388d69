//! Error types for EntropyMax operations.
//!
//! Structural problems (unreadable files, malformed tables, partitions that
//! are not total) surface here. Per-K metric disagreements are not errors;
//! they are collected as [`crate::validation::Discrepancy`] values.

use std::fmt;

/// Main error type for EntropyMax operations.
///
/// # Examples
///
/// ```
/// use entropymax::error::EntropyMaxError;
///
/// let err = EntropyMaxError::malformed("column 3", "bin header '1.2x' is not numeric");
/// assert!(err.to_string().contains("Malformed input"));
/// assert!(err.to_string().contains("column 3"));
/// ```
#[derive(Debug)]
pub enum EntropyMaxError {
    /// Input table is structurally invalid (missing sample column,
    /// unparsable bin header, non-numeric cell).
    MalformedInput {
        /// Where the problem was found (row/column description)
        location: String,
        /// What was wrong
        message: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A partition is not a total function onto `[0, k)`.
    InvalidPartition {
        /// Reason the labels were rejected
        reason: String,
    },

    /// The requested statistic is undefined for this number of groups.
    InvalidGroupCount {
        /// Number of groups supplied
        k: usize,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// CSV decoding error.
    Csv(csv::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for EntropyMaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyMaxError::MalformedInput { location, message } => {
                write!(f, "Malformed input at {location}: {message}")
            }
            EntropyMaxError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            EntropyMaxError::InvalidPartition { reason } => {
                write!(f, "Invalid partition: {reason}")
            }
            EntropyMaxError::InvalidGroupCount { k, constraint } => {
                write!(f, "Invalid group count: k = {k}, expected {constraint}")
            }
            EntropyMaxError::Io(e) => write!(f, "I/O error: {e}"),
            EntropyMaxError::Csv(e) => write!(f, "CSV error: {e}"),
            EntropyMaxError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EntropyMaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EntropyMaxError::Io(e) => Some(e),
            EntropyMaxError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EntropyMaxError {
    fn from(err: std::io::Error) -> Self {
        EntropyMaxError::Io(err)
    }
}

impl From<csv::Error> for EntropyMaxError {
    fn from(err: csv::Error) -> Self {
        EntropyMaxError::Csv(err)
    }
}

impl From<&str> for EntropyMaxError {
    fn from(msg: &str) -> Self {
        EntropyMaxError::Other(msg.to_string())
    }
}

impl From<String> for EntropyMaxError {
    fn from(msg: String) -> Self {
        EntropyMaxError::Other(msg)
    }
}

impl EntropyMaxError {
    /// Create a malformed-input error for the given location
    #[must_use]
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid partition error
    #[must_use]
    pub fn invalid_partition(reason: impl Into<String>) -> Self {
        Self::InvalidPartition {
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by the shape or content of the input
    /// tables rather than the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. } | Self::DimensionMismatch { .. } | Self::Csv(_)
        )
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EntropyMaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_display() {
        let err = EntropyMaxError::malformed("row 7, column '0.5'", "'abc' is not a number");
        let msg = err.to_string();
        assert!(msg.contains("Malformed input"));
        assert!(msg.contains("row 7"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = EntropyMaxError::dimension_mismatch("labels", 4, 3);
        let msg = err.to_string();
        assert!(msg.contains("labels=4"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_invalid_group_count_display() {
        let err = EntropyMaxError::InvalidGroupCount {
            k: 1,
            constraint: "k >= 2".to_string(),
        };
        assert!(err.to_string().contains("k = 1"));
        assert!(err.to_string().contains("k >= 2"));
    }

    #[test]
    fn test_invalid_partition_display() {
        let err = EntropyMaxError::invalid_partition("label 5 outside [0, 3)");
        assert!(err.to_string().starts_with("Invalid partition"));
    }

    #[test]
    fn test_io_error_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err = EntropyMaxError::from(io_err);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_from_str() {
        let err: EntropyMaxError = "test error".into();
        assert!(matches!(err, EntropyMaxError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_is_input_error() {
        assert!(EntropyMaxError::malformed("header", "empty").is_input_error());
        assert!(!EntropyMaxError::invalid_partition("x").is_input_error());
    }
}
