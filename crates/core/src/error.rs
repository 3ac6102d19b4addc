//! Unified error types for sitemap-sync.
//!
//! Each variant carries a stable code prefix so log lines and the run summary
//! can be grepped by failure class.

use std::path::PathBuf;

/// Unified error types for the sitemap synchronization engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty site URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Cache file could not be read or written.
    #[error("CACHE_ERROR: {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache file exists but does not hold a valid URL mapping.
    #[error("CACHE_CORRUPT: {path}: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    /// Sitemap document or cache could not be written to its target.
    #[error("WRITE_FAILED: {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a document or the cache failed.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Short, stable code used in summaries and structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Cache { .. } => "CACHE_ERROR",
            Error::CacheCorrupt { .. } => "CACHE_CORRUPT",
            Error::WriteFailed { .. } => "WRITE_FAILED",
            Error::Serialize(_) => "SERIALIZE_FAILED",
        }
    }
}
