use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by direct (non-fallback) config lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config `{0}` not found")]
    NotFound(String),

    #[error("config `{key}` is not convertible to {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// An intermediate path segment resolved to something other than an object.
    #[error("config `{0}` is not an object")]
    PathInvalid(String),
}

/// Failures raised by the ban database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open ban database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to prepare statement: {0}")]
    Prepare(#[source] rusqlite::Error),

    /// Unknown query names resolve to empty SQL, which cannot be prepared.
    #[error("failed to prepare statement: query text is empty")]
    EmptyQuery,

    #[error("failed to step statement: {0}")]
    Step(#[source] rusqlite::Error),

    #[error("failed to close ban database: {0}")]
    Close(#[source] rusqlite::Error),
}

/// Per-record metadata that could not be decoded. Never fatal.
#[derive(Debug, Error)]
pub enum MetadataParseError {
    #[error("metadata is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("metadata is not valid JSON: {0}")]
    Json(#[from] json5::Error),
}
