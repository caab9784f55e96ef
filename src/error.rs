//! Error types for word frequency analysis.

use thiserror::Error;

/// Top-level error type for analysis runs and the jobs built on them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid option combination, detected before any token is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The document source could not resolve an identifier.
    #[error("unknown document: {0}")]
    UnknownDocument(String),

    /// A document or term-vector source failed or returned malformed data.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
