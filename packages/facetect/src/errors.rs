//! Error types for facetect.
//!
//! Detector failures never cross the manager boundary: `process_file`
//! logs them and treats the run as "no facet detected". The variants here
//! surface only from explicit fallible operations (persistence, content
//! access).

use thiserror::Error;

/// Main error type for detection operations.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// IO error (file content access, policy-state persistence)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A detector reported a failure while inspecting a file
    #[error("Detector error: {0}")]
    Detector(String),

    /// The owning project has been disposed
    #[error("Project disposed")]
    Disposed,
}

impl DetectionError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        DetectionError::Storage(msg.into())
    }

    /// Create a detector error
    pub fn detector(msg: impl Into<String>) -> Self {
        DetectionError::Detector(msg.into())
    }
}

impl From<serde_json::Error> for DetectionError {
    fn from(err: serde_json::Error) -> Self {
        DetectionError::Storage(err.to_string())
    }
}

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, DetectionError>;
