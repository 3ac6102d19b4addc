//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn require_https(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::Invalid { field: field.into(), reason: format!("not a valid URL: {e}") })?;
    if parsed.scheme() != "https" {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must use https".into() });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `site_url` or `api_base_url` is not an https URL
    /// - `concurrency` is 0 or exceeds 100
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_https("site_url", &self.site_url)?;
        require_https("api_base_url", &self.api_base_url)?;

        if self.concurrency == 0 {
            return Err(ConfigError::Invalid { field: "concurrency".into(), reason: "must be at least 1".into() });
        }
        if self.concurrency > 100 {
            return Err(ConfigError::Invalid { field: "concurrency".into(), reason: "must not exceed 100".into() });
        }

        for (field, value) in [("timeout_ms", self.timeout_ms), ("fetch_timeout_ms", self.fetch_timeout_ms)] {
            if value < 100 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > 300_000 {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }

    /// Settings that are valid but probably not what was intended.
    ///
    /// Returned rather than logged, since configuration is loaded before the
    /// subscriber is installed.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.check_reachability && !self.prune_enabled {
            warnings.push("check_reachability is set but prune_enabled is false; no URLs will be checked");
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_warnings_for_reachability_without_pruning() {
        assert!(AppConfig::default().warnings().is_empty());

        let config = AppConfig { check_reachability: true, prune_enabled: false, ..Default::default() };
        assert!(config.validate().is_ok());
        assert_eq!(config.warnings().len(), 1);
        assert!(config.warnings()[0].contains("check_reachability"));

        let config = AppConfig { check_reachability: true, ..Default::default() };
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_validate_http_site_url() {
        let config = AppConfig { site_url: "http://www.example.com".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "site_url"));
    }

    #[test]
    fn test_validate_garbage_api_url() {
        let config = AppConfig { api_base_url: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_concurrency_zero() {
        let config = AppConfig { concurrency: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "concurrency"));
    }

    #[test]
    fn test_validate_concurrency_exceeds_limit() {
        let config = AppConfig { concurrency: 101, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "concurrency"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_fetch_timeout_exceeds_limit() {
        let config = AppConfig { fetch_timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { concurrency: 1, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { concurrency: 100, timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
