//! Content API client error types.

use std::sync::Arc;

/// Errors from the content API client.
///
/// Every variant is recoverable from the run's point of view: the affected
/// collection degrades to empty.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContentError {
    /// Endpoint URL could not be built from the configured base.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// The API answered with an HTML page (usually a proxy or error page).
    #[error("unexpected HTML response")]
    HtmlResponse,

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body is not a JSON collection.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ContentError::Timeout } else { ContentError::Network(Arc::new(err)) }
    }
}
