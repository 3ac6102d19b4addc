//! HEAD-request reachability probe.
//!
//! - Redirects are not followed by the HTTP client; the probe inspects each
//!   hop itself and re-checks the `Location` target once.
//! - A redirect at the depth limit counts as valid.
//! - `404` and any other status `>= 400` reject the URL.

use std::time::Duration;

use reqwest::{Client, StatusCode, header, redirect};
use sitemap_sync_core::AppConfig;

use super::PruneReason;

/// Maximum number of redirect hops followed per URL.
pub const MAX_REDIRECT_DEPTH: u8 = 1;

/// Checks whether a URL still resolves.
#[async_trait::async_trait]
pub trait UrlProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), PruneReason>;
}

/// Reachability probe over HTTP HEAD.
#[derive(Debug, Clone)]
pub struct ReachabilityChecker {
    http: Client,
    timeout: Duration,
}

impl ReachabilityChecker {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .use_rustls_tls()
            .build()?;

        Ok(Self { http, timeout })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_agent, config.timeout())
    }

    /// Probe `url`, following at most [`MAX_REDIRECT_DEPTH`] redirects.
    pub async fn check(&self, url: &str) -> Result<(), PruneReason> {
        let mut current = url::Url::parse(url).map_err(|e| PruneReason::Unparseable(e.to_string()))?;
        let mut depth = 0u8;

        loop {
            let (status, location) = self.head(&current).await?;

            if status.is_success() {
                return Ok(());
            }

            if status.is_redirection() {
                let Some(location) = location else {
                    return Err(PruneReason::RedirectWithoutLocation);
                };

                if depth >= MAX_REDIRECT_DEPTH {
                    tracing::debug!(url = %url, depth, "redirect limit reached, accepting");
                    return Ok(());
                }

                current = current.join(&location).map_err(|e| PruneReason::Unparseable(e.to_string()))?;
                depth += 1;
                tracing::debug!(url = %url, target = %current, depth, "following redirect");
                continue;
            }

            return Err(match status {
                StatusCode::NOT_FOUND => PruneReason::NotFound,
                other => PruneReason::HttpStatus(other.as_u16()),
            });
        }
    }

    async fn head(&self, url: &url::Url) -> Result<(StatusCode, Option<String>), PruneReason> {
        let request = self.http.head(url.clone()).send();

        let response = match tokio::time::timeout(self.timeout, request).await {
            Err(_) => return Err(PruneReason::Timeout),
            Ok(Err(e)) if e.is_timeout() => return Err(PruneReason::Timeout),
            Ok(Err(e)) => return Err(PruneReason::Network(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok((response.status(), location))
    }
}

#[async_trait::async_trait]
impl UrlProbe for ReachabilityChecker {
    async fn probe(&self, url: &str) -> Result<(), PruneReason> {
        self.check(url).await
    }
}
