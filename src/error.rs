//! Centralized error types for classfetch.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the classfetch library.
#[derive(Error, Debug)]
pub enum ReportError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file or folder does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The report file could not be decoded as a class report.
    #[error("Invalid report '{path}': {reason}")]
    InvalidReport { path: PathBuf, reason: String },

    /// A network-level failure from the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// An export operation failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenience alias for `Result<T, ReportError>`.
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `ReportError`
/// when no path context is available (rare — prefer `ReportError::io`).
impl From<std::io::Error> for ReportError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
