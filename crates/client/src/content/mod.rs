//! Content API client.
//!
//! Fetches the three item collections that feed the sitemaps.
//!
//! ### Response handling
//! - `204 No Content` is an empty collection.
//! - Non-2xx, HTML bodies and malformed JSON are errors; callers degrade the
//!   collection to empty.
//! - The body may be a bare array or an object wrapping it under `data` or
//!   `items`. Elements that do not deserialize are skipped individually.
//!
//! ### Filtering
//! - Vehicles: only listings flagged active.
//! - Accessories: only active and approved listings.

pub mod error;

pub use error::ContentError;

use std::time::{Duration, Instant};

use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sitemap_sync_core::{Accessory, AppConfig, Article, Vehicle};

/// Configuration for the content client.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// API root, e.g. `https://api.example.com`.
    pub base_url: String,
    pub vehicles_path: String,
    pub articles_path: String,
    pub accessories_path: String,
    /// Request timeout (default: 20s)
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl ContentConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            vehicles_path: config.vehicles_path.clone(),
            articles_path: config.articles_path.clone(),
            accessories_path: config.accessories_path.clone(),
            timeout: config.fetch_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Source of the item collections. Implemented over HTTP by
/// [`ContentClient`]; tests substitute fixed data.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Active vehicle listings.
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ContentError>;

    async fn articles(&self) -> Result<Vec<Article>, ContentError>;

    /// Active, approved accessory listings.
    async fn accessories(&self) -> Result<Vec<Accessory>, ContentError>;
}

/// HTTP client for the content API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    config: ContentConfig,
}

impl ContentClient {
    /// Create a new content client with the given configuration.
    pub fn new(config: ContentConfig) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(ContentError::from)?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ContentError> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        url::Url::parse(&format!("{base}/{path}")).map_err(|e| ContentError::InvalidUrl(e.to_string()))
    }

    /// Fetch one collection endpoint.
    pub async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ContentError> {
        let url = self.endpoint(path)?;
        let start = Instant::now();

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = response.bytes().await?;

        let items = parse_collection(status, content_type.as_deref(), &bytes)?;

        tracing::debug!(
            "fetched {} -> {} items in {}ms ({} bytes)",
            url,
            items.len(),
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(items)
    }
}

#[async_trait::async_trait]
impl ContentSource for ContentClient {
    async fn vehicles(&self) -> Result<Vec<Vehicle>, ContentError> {
        let all: Vec<Vehicle> = self.fetch_collection(&self.config.vehicles_path).await?;
        Ok(all.into_iter().filter(Vehicle::is_listed).collect())
    }

    async fn articles(&self) -> Result<Vec<Article>, ContentError> {
        self.fetch_collection(&self.config.articles_path).await
    }

    async fn accessories(&self) -> Result<Vec<Accessory>, ContentError> {
        let all: Vec<Accessory> = self.fetch_collection(&self.config.accessories_path).await?;
        Ok(all.into_iter().filter(Accessory::is_listed).collect())
    }
}

/// Interpret a content API response as a collection of `T`.
pub fn parse_collection<T: DeserializeOwned>(
    status: StatusCode, content_type: Option<&str>, body: &[u8],
) -> Result<Vec<T>, ContentError> {
    if status == StatusCode::NO_CONTENT {
        return Ok(Vec::new());
    }

    if !status.is_success() {
        return Err(ContentError::HttpError { status: status.as_u16() });
    }

    let looks_like_html = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
        || body.trim_ascii_start().starts_with(b"<");
    if looks_like_html {
        return Err(ContentError::HtmlResponse);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| ContentError::Parse(e.to_string()))?;

    let elements = match value {
        Value::Array(elements) => elements,
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("items")) {
            Some(Value::Array(elements)) => elements,
            _ => return Err(ContentError::Parse("object response without a data/items array".into())),
        },
        other => return Err(ContentError::Parse(format!("expected a JSON array, got {}", json_kind(&other)))),
    };

    let items: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| match serde_json::from_value(element) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "skipping malformed element");
                None
            }
        })
        .collect();

    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ContentClient {
        ContentClient::new(ContentConfig { base_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_parse_no_content() {
        let items: Vec<Article> = parse_collection(StatusCode::NO_CONTENT, None, b"").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_http_error() {
        let result: Result<Vec<Article>, _> = parse_collection(StatusCode::BAD_GATEWAY, None, b"[]");
        assert!(matches!(result, Err(ContentError::HttpError { status: 502 })));
    }

    #[test]
    fn test_parse_html_body() {
        let body = b"  <!DOCTYPE html><html><body>Maintenance</body></html>";
        let result: Result<Vec<Article>, _> = parse_collection(StatusCode::OK, Some("application/json"), body);
        assert!(matches!(result, Err(ContentError::HtmlResponse)));

        let result: Result<Vec<Article>, _> = parse_collection(StatusCode::OK, Some("text/html; charset=utf-8"), b"[]");
        assert!(matches!(result, Err(ContentError::HtmlResponse)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let result: Result<Vec<Article>, _> = parse_collection(StatusCode::OK, None, b"[{\"id\": 1,");
        assert!(matches!(result, Err(ContentError::Parse(_))));

        let result: Result<Vec<Article>, _> = parse_collection(StatusCode::OK, None, b"\"nope\"");
        assert!(matches!(result, Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_parse_wrapped_and_skips_bad_elements() {
        let body = br#"{"data": [{"id": 1, "slug": "a"}, "not an article", {"id": 3}]}"#;
        let items: Vec<Article> = parse_collection(StatusCode::OK, None, body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].slug.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_keeps_loosely_typed_listings() {
        let body = br#"[
            {"id": 1, "slug": "a", "is_active": 1},
            {"id": 2, "slug": "b", "updated_at": "2024-01-01", "updatedAt": "2024-01-01"},
            {"id": 3, "slug": "c", "updated_at": 1714521600},
            {"id": 4, "slug": "d"}
        ]"#;
        let vehicles: Vec<Vehicle> = parse_collection(StatusCode::OK, None, body).unwrap();
        assert_eq!(vehicles.len(), 4);
        assert!(vehicles.iter().all(Vehicle::is_listed));
        assert_eq!(vehicles[1].updated_at(), Some("2024-01-01"));
        assert_eq!(vehicles[2].updated_at(), Some("1714521600"));

        let body = br#"[{"id": 5, "name": "Roof box", "title": "Roof box", "status": "approved"}]"#;
        let accessories: Vec<Accessory> = parse_collection(StatusCode::OK, None, body).unwrap();
        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories[0].name(), Some("Roof box"));
    }

    #[tokio::test]
    async fn test_client_new() {
        assert!(ContentClient::new(ContentConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_vehicles_filtered_to_active() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "slug": "listed", "is_active": true},
                {"id": 2, "slug": "hidden", "is_active": false},
                {"id": 3, "slug": "sold", "status": "sold"}
            ])))
            .mount(&server)
            .await;

        let vehicles = client_for(&server).vehicles().await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].slug.as_deref(), Some("listed"));
    }

    #[tokio::test]
    async fn test_accessories_filtered_to_approved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accessories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": [
                {"id": 1, "name": "Roof box", "is_active": true, "status": "approved"},
                {"id": 2, "name": "Tow bar", "is_active": true, "status": "pending"}
            ]})))
            .mount(&server)
            .await;

        let accessories = client_for(&server).accessories().await.unwrap();
        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories[0].name(), Some("Roof box"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).articles().await;
        assert!(matches!(result, Err(ContentError::HttpError { status: 500 })));
    }

    #[tokio::test]
    async fn test_no_content_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let articles = client_for(&server).articles().await.unwrap();
        assert!(articles.is_empty());
    }
}
