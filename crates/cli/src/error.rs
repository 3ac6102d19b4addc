//! Errors that end a sync run.

use std::process::ExitStatus;

use sitemap_sync_core::ConfigError;

/// Fatal errors for the sitemap-sync binary.
///
/// Everything recoverable (fetch failures, rejected URLs, cache I/O, mirror
/// writes) is logged and reported in the summary instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("INVALID_CONFIG: {0}")]
    Config(#[from] ConfigError),

    /// Primary output failed, or the site context could not be built.
    #[error(transparent)]
    Core(#[from] sitemap_sync_core::Error),

    /// HTTP client construction failed.
    #[error("CLIENT_INIT: {0}")]
    ClientInit(String),

    #[error("VALIDATION_SPAWN: `{command}`: {source}")]
    ValidationSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The post-run validation command exited unsuccessfully.
    #[error("VALIDATION_FAILED: `{command}` {status}")]
    ValidationFailed { command: String, status: ExitStatus },
}
