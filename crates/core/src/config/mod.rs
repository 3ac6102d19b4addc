//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SITEMAP_SYNC_*)
//! 2. TOML config file (if SITEMAP_SYNC_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Prefix shared by every recognized environment variable.
pub const ENV_PREFIX: &str = "SITEMAP_SYNC_";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SITEMAP_SYNC_*)
/// 2. TOML config file (if SITEMAP_SYNC_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Canonical site root every sitemap `loc` is built from.
    ///
    /// Set via SITEMAP_SYNC_SITE_URL environment variable.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Content API root. Must be HTTPS.
    ///
    /// Set via SITEMAP_SYNC_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_vehicles_path")]
    pub vehicles_path: String,

    #[serde(default = "default_articles_path")]
    pub articles_path: String,

    #[serde(default = "default_accessories_path")]
    pub accessories_path: String,

    /// Primary output directory. Write failures here abort the run.
    ///
    /// Set via SITEMAP_SYNC_OUTPUT_DIR environment variable.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Build output directory that receives a copy of every document,
    /// but only when it already exists.
    ///
    /// Set via SITEMAP_SYNC_SECONDARY_OUTPUT_DIR environment variable.
    #[serde(default = "default_secondary_output_dir")]
    pub secondary_output_dir: Option<PathBuf>,

    /// Path to the JSON lastmod cache.
    ///
    /// Set via SITEMAP_SYNC_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Whether candidate URLs are format-checked before assembly.
    ///
    /// Set via SITEMAP_SYNC_PRUNE_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub prune_enabled: bool,

    /// Whether format-valid URLs are additionally checked with HEAD requests.
    ///
    /// Set via SITEMAP_SYNC_CHECK_REACHABILITY environment variable.
    #[serde(default)]
    pub check_reachability: bool,

    /// Reachability batch size.
    ///
    /// Set via SITEMAP_SYNC_CONCURRENCY environment variable.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request HEAD timeout in milliseconds.
    ///
    /// Set via SITEMAP_SYNC_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Content API request timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Skip the post-run validation command even when one is configured.
    ///
    /// Set via SITEMAP_SYNC_SKIP_VALIDATION environment variable.
    #[serde(default)]
    pub skip_validation: bool,

    /// Shell command run after the documents are written.
    #[serde(default)]
    pub validation_command: Option<String>,

    /// Image used when an item has no resolvable images.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Host whose image URLs are harvested from article bodies.
    #[serde(default = "default_image_cdn_host")]
    pub image_cdn_host: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_site_url() -> String {
    "https://www.example.com".into()
}

fn default_api_base_url() -> String {
    "https://api.example.com".into()
}

fn default_vehicles_path() -> String {
    "/vehicles".into()
}

fn default_articles_path() -> String {
    "/articles".into()
}

fn default_accessories_path() -> String {
    "/accessories".into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_secondary_output_dir() -> Option<PathBuf> {
    Some(PathBuf::from("dist"))
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".sitemap-cache.json")
}

fn default_concurrency() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_fetch_timeout_ms() -> u64 {
    20_000
}

fn default_placeholder_image() -> String {
    "https://www.example.com/images/placeholder.jpg".into()
}

fn default_image_cdn_host() -> String {
    "cdn.example.com".into()
}

fn default_user_agent() -> String {
    "sitemap-sync/0.1".into()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            api_base_url: default_api_base_url(),
            vehicles_path: default_vehicles_path(),
            articles_path: default_articles_path(),
            accessories_path: default_accessories_path(),
            output_dir: default_output_dir(),
            secondary_output_dir: default_secondary_output_dir(),
            cache_path: default_cache_path(),
            prune_enabled: true,
            check_reachability: false,
            concurrency: default_concurrency(),
            timeout_ms: default_timeout_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            skip_validation: false,
            validation_command: None,
            placeholder_image: default_placeholder_image(),
            image_cdn_host: default_image_cdn_host(),
            user_agent: default_user_agent(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// HEAD timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SITEMAP_SYNC_`
    /// 2. TOML file from `SITEMAP_SYNC_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SITEMAP_SYNC_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The validation command, unless validation is disabled or unset.
    pub fn validation_step(&self) -> Option<&str> {
        if self.skip_validation {
            return None;
        }
        self.validation_command.as_deref().map(str::trim).filter(|cmd| !cmd.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site_url, "https://www.example.com");
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.secondary_output_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.timeout_ms, 5_000);
        assert!(config.prune_enabled);
        assert!(!config.check_reachability);
        assert!(!config.skip_validation);
        assert!(config.validation_command.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(5_000));
        assert_eq!(config.fetch_timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_validation_step() {
        let mut config = AppConfig { validation_command: Some("npm run validate:sitemaps".into()), ..Default::default() };
        assert_eq!(config.validation_step(), Some("npm run validate:sitemaps"));

        config.skip_validation = true;
        assert_eq!(config.validation_step(), None);

        let blank = AppConfig { validation_command: Some("   ".into()), ..Default::default() };
        assert_eq!(blank.validation_step(), None);
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SITEMAP_SYNC_PRUNE_ENABLED", "false");
            jail.set_env("SITEMAP_SYNC_CHECK_REACHABILITY", "true");
            jail.set_env("SITEMAP_SYNC_CONCURRENCY", "4");
            jail.set_env("SITEMAP_SYNC_TIMEOUT_MS", "2500");

            let config = AppConfig::load().expect("config loads");
            assert!(!config.prune_enabled);
            assert!(config.check_reachability);
            assert_eq!(config.concurrency, 4);
            assert_eq!(config.timeout_ms, 2500);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("sitemap.toml", "site_url = \"https://cars.example.org\"\nskip_validation = true\n")?;
            jail.set_env("SITEMAP_SYNC_CONFIG_FILE", "sitemap.toml");

            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.site_url, "https://cars.example.org");
            assert!(config.skip_validation);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_http_api() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SITEMAP_SYNC_API_BASE_URL", "http://api.example.com");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
