//! Error types for emax-cli

use entropymax::EntropyMaxError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Not a file (e.g., directory)
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    /// Input table or page file is structurally invalid
    #[error("Invalid input: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// At least one discrepancy was recorded
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Any other library error
    #[error("EntropyMax error: {0}")]
    Engine(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound(_) | Self::NotAFile(_) => ExitCode::from(3),
            Self::InvalidFormat(_) => ExitCode::from(4),
            Self::ValidationFailed(_) => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(7),
            Self::Json(_) | Self::Engine(_) => ExitCode::from(1),
        }
    }
}

impl From<EntropyMaxError> for CliError {
    fn from(e: EntropyMaxError) -> Self {
        match e {
            EntropyMaxError::Io(io) => Self::Io(io),
            e if e.is_input_error() => Self::InvalidFormat(e.to_string()),
            e => Self::Engine(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::FileNotFound(PathBuf::from("x")).exit_code(),
            ExitCode::from(3)
        );
        assert_eq!(
            CliError::InvalidFormat("x".into()).exit_code(),
            ExitCode::from(4)
        );
        assert_eq!(
            CliError::ValidationFailed("x".into()).exit_code(),
            ExitCode::from(5)
        );
    }

    #[test]
    fn test_malformed_maps_to_invalid_format() {
        let err = CliError::from(EntropyMaxError::malformed("header column 1", "no sample column"));
        assert!(matches!(err, CliError::InvalidFormat(_)));
        assert!(err.to_string().contains("header column 1"));
    }

    #[test]
    fn test_io_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(CliError::from(EntropyMaxError::Io(io)), CliError::Io(_)));
    }

    #[test]
    fn test_partition_error_maps_to_engine() {
        let err = CliError::from(EntropyMaxError::invalid_partition("label 3 outside [0, 2)"));
        assert!(matches!(err, CliError::Engine(_)));
    }
}
