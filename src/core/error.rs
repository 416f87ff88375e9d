//! Error types and error handling for letter-search.
//!
//! This module defines the error types used throughout the
//! application. Per-document extraction failures have their own
//! [`ExtractError`] type because they never escape a build pass:
//! the index engine logs them and moves on.

use thiserror::Error;

/// Result type alias for letter-search operations
pub type Result<T> = std::result::Result<T, LetterSearchError>;

/// Main error type for letter-search
#[derive(Error, Debug)]
pub enum LetterSearchError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Index not found at {0}")]
    IndexNotFound(String),

    #[error("An index build is already running")]
    BuildInProgress,

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl LetterSearchError {
    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LetterSearchError::IndexNotFound(_) | LetterSearchError::InvalidPath(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            LetterSearchError::InvalidQuery(_) | LetterSearchError::ConfigError(_)
        )
    }

    /// Check if this error aborts a build pass
    ///
    /// Storage-layer failures are fatal; the previously committed
    /// index stays valid.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LetterSearchError::StorageError(_)
                | LetterSearchError::IoError(_)
                | LetterSearchError::SerdeError(_)
        )
    }
}

/// Failure of a single text extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no extractor registered for extension '{0}'")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
