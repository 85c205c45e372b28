//! Error types for MBP reconstruction.
//!
//! Only fatal conditions live here: an input that cannot be opened, an output
//! that cannot be created, or an I/O failure mid-run. Malformed fields and
//! unknown order ids are handled inline by the decoder and the book and never
//! become errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, MbpError>;

/// Main error type for reconstruction operations.
#[derive(Error, Debug, Clone)]
pub enum MbpError {
    /// The input record file could not be opened
    #[error("Cannot open input {}: {reason}", path.display())]
    InputUnavailable { path: PathBuf, reason: String },

    /// The output destination could not be created
    #[error("Cannot create output {}: {reason}", path.display())]
    OutputUnavailable { path: PathBuf, reason: String },

    /// I/O failure while reading or writing records
    #[error("IO error: {0}")]
    Io(String),

    /// CSV framing failure while reading or writing records
    #[error("CSV error: {0}")]
    Csv(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Generic(String),
}

impl MbpError {
    /// Create a generic error from any string-like type.
    pub fn generic(msg: impl Into<String>) -> Self {
        MbpError::Generic(msg.into())
    }
}

impl From<std::io::Error> for MbpError {
    fn from(err: std::io::Error) -> Self {
        MbpError::Io(err.to_string())
    }
}

impl From<csv::Error> for MbpError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            MbpError::Io(err.to_string())
        } else {
            MbpError::Csv(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MbpError {
    fn from(err: serde_json::Error) -> Self {
        MbpError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for MbpError {
    fn from(err: String) -> Self {
        MbpError::Generic(err)
    }
}

impl From<&str> for MbpError {
    fn from(err: &str) -> Self {
        MbpError::Generic(err.to_string())
    }
}
