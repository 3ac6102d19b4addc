//! Core types and shared functionality for sitemap-sync.
//!
//! This crate provides:
//! - Layered configuration and unified error types
//! - Content normalization and per-category item adapters
//! - The JSON lastmod cache with fingerprint-based change detection
//! - De-listing cleanup, sitemap XML assembly and atomic output

pub mod cache;
pub mod config;
pub mod delist;
pub mod error;
pub mod items;
pub mod normalize;
pub mod sitemap;

pub use cache::{CacheEntry, CacheStore, ChangeTracker, SitemapCache};
pub use config::{AppConfig, ConfigError};
pub use delist::{DelistOutcome, DelistingStats, delist, delist_items};
pub use error::Error;
pub use items::{Accessory, Article, Category, ImageRef, SiteContext, SitemapItem, StaticPage, Vehicle};
pub use sitemap::{ChangeFreq, OutputWriter, WrittenDocument};
