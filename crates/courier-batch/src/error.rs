//! # Batch Error Types
//!
//! Error types for configuration and transaction file processing.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / toml / serde_json / CoreError                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BatchError (this module) ← Adds the path or setting involved          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  anyhow::Error (binary) ← Adds "what were we doing" context            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stderr + exit status 1                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad rows are never errors; they are written out as `Ignored`. The one
//! fatal data condition is a missing input file.

use std::path::PathBuf;

use courier_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    // =========================================================================
    // Input / Output
    // =========================================================================
    /// Input transaction file does not exist.
    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// Reading or writing a specific file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON output row could not be encoded.
    #[error("Failed to encode output row: {0}")]
    Encode(#[from] serde_json::Error),

    // =========================================================================
    // Configuration
    // =========================================================================
    /// Config file is not valid TOML for [`CourierConfig`](crate::CourierConfig).
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be written back as TOML.
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config parsed but failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Engine setup rejected the configured catalogs.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Logging
    // =========================================================================
    /// Subscriber could not be installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl BatchError {
    /// Wraps an I/O error with the file it concerns, mapping "not found"
    /// on the input side to [`BatchError::InputNotFound`].
    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            BatchError::InputNotFound { path }
        } else {
            BatchError::File { path, source }
        }
    }

    /// Wraps an I/O error with the file it concerns.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BatchError::File {
            path: path.into(),
            source,
        }
    }
}

impl From<ValidationError> for BatchError {
    fn from(err: ValidationError) -> Self {
        BatchError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_input_not_found_mapping() {
        let err = BatchError::input("data/input.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, BatchError::InputNotFound { .. }));
        assert_eq!(err.to_string(), "Input file not found: data/input.txt");

        let err = BatchError::input("data/input.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, BatchError::File { .. }));
    }

    #[test]
    fn test_validation_becomes_invalid_config() {
        let err: BatchError = ValidationError::MustBePositive {
            field: "monthly_cap".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid configuration: monthly_cap must be positive");
    }
}
