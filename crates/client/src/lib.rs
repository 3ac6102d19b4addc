//! Network-facing code for sitemap-sync.
//!
//! This crate provides the content API client that supplies sitemap items
//! and the URL-validity pruner that filters them before assembly.

pub mod content;
pub mod prune;

pub use content::{ContentClient, ContentConfig, ContentError, ContentSource};
pub use prune::{PruneOutcome, PruneReason, PrunedUrl, PruningStats, ReachabilityChecker, UrlProbe, prune};
