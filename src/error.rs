//! Error types.
//!
//! Errors are split by the collaborator that raised them: the tabular
//! source, the blob store, or the configuration layer. `TimetableError`
//! is what the generation pipeline propagates to its request boundary.

use thiserror::Error;

/// Failures while loading the tabular dataset.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No data found in {sheet} ({label})")]
    EmptySheet { sheet: String, label: String },

    #[error("Failed to read source '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed source data: {0}")]
    Malformed(String),
}

/// Failures raised by a blob store or while encoding payloads for it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Storage operation failed for '{key}': {reason}")]
    Backend { key: String, reason: String },

    #[error("Failed to encode or decode timetable '{key}': {reason}")]
    Codec { key: String, reason: String },
}

/// Errors surfaced by the generation pipeline.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<config::ConfigError> for TimetableError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl StoreError {
    /// Whether this error only means the key was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
