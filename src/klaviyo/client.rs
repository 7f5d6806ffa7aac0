//! Klaviyo REST client
//!
//! Covers the two listing endpoints the reporting scripts need. Retry and
//! throttling come from the shared [`HttpClient`].

use super::types::{ListResponse, ResourceKind};
use crate::auth::{AuthConfig, Authenticator};
use crate::config::KlaviyoConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{Page, PageSource, DEFAULT_CURSOR_PARAM};
use crate::types::BackoffType;
use async_trait::async_trait;
use std::time::Duration;

/// Authenticated handle to the Klaviyo API
#[derive(Debug)]
pub struct KlaviyoClient {
    http: HttpClient,
}

impl KlaviyoClient {
    /// Build a client for `api_key`
    pub fn new(api_key: &str, config: &KlaviyoConfig, timeout: Duration) -> Result<Self> {
        let mut builder = HttpClientConfig::builder()
            .base_url(&config.base_url)
            .timeout(timeout)
            .max_retries(config.max_retries)
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(500),
                config.max_delay(),
            )
            .header("revision", &config.revision)
            .header("accept", "application/vnd.api+json");
        if let Some(rate_limit) = config.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }

        let auth = Authenticator::new(AuthConfig::ApiKey {
            header: "Authorization".to_string(),
            prefix: Some("Klaviyo-API-Key ".to_string()),
            value: api_key.to_string(),
        });

        Ok(Self {
            http: HttpClient::with_auth(builder.build(), auth)?,
        })
    }

    /// Fetch one page of `kind`
    pub async fn list(&self, kind: ResourceKind, cursor: Option<&str>) -> Result<Page> {
        let request = RequestConfig::new().query_opt(DEFAULT_CURSOR_PARAM, cursor);
        let response: ListResponse = self.http.get_json(kind.path(), request).await?;
        Ok(response.into_page())
    }

    /// Page source for `kind`
    pub fn pages(&self, kind: ResourceKind) -> ResourcePageSource<'_> {
        ResourcePageSource { client: self, kind }
    }

    /// The underlying HTTP client configuration
    pub fn http_config(&self) -> &HttpClientConfig {
        self.http.config()
    }
}

/// A client bound to one resource kind
#[derive(Debug, Clone, Copy)]
pub struct ResourcePageSource<'a> {
    client: &'a KlaviyoClient,
    kind: ResourceKind,
}

impl ResourcePageSource<'_> {
    /// The bound kind
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

#[async_trait]
impl PageSource for ResourcePageSource<'_> {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        self.client.list(self.kind, cursor).await
    }
}
