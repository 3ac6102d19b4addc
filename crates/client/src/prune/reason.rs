//! Why a URL was dropped from the sitemap.

use std::fmt;

/// Rejection reason for a single URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PruneReason {
    #[error("no URL")]
    Missing,

    #[error("leading or trailing whitespace")]
    Whitespace,

    #[error("scheme is not https")]
    NotHttps,

    #[error("contains query characters")]
    QueryString,

    #[error("unparseable: {0}")]
    Unparseable(String),

    #[error("not found (404)")]
    NotFound,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("redirect without Location header")]
    RedirectWithoutLocation,

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

impl PruneReason {
    /// Stable key used when counting rejections.
    pub fn as_str(&self) -> &'static str {
        match self {
            PruneReason::Missing => "missing_url",
            PruneReason::Whitespace => "whitespace",
            PruneReason::NotHttps => "not_https",
            PruneReason::QueryString => "query_string",
            PruneReason::Unparseable(_) => "unparseable",
            PruneReason::NotFound => "not_found",
            PruneReason::HttpStatus(_) => "http_status",
            PruneReason::RedirectWithoutLocation => "redirect_without_location",
            PruneReason::Timeout => "timeout",
            PruneReason::Network(_) => "network_error",
        }
    }

    /// Failure of the checker rather than an answer from the site.
    pub fn is_transient(&self) -> bool {
        matches!(self, PruneReason::Timeout | PruneReason::Network(_))
    }
}

/// A dropped URL kept as a sample for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedUrl {
    pub url: String,
    pub reason: PruneReason,
}

impl fmt::Display for PrunedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() { write!(f, "<none>: {}", self.reason) } else { write!(f, "{}: {}", self.url, self.reason) }
    }
}
