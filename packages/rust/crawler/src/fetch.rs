//! HTTP fetching for pages and images.

use std::time::Duration;

use blogbook_shared::{BlogbookError, HttpConfig, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Thin wrapper around a configured `reqwest::Client`.
///
/// Every failure (transport, non-2xx status, body read) becomes
/// [`BlogbookError::Network`]; callers decide whether it is fatal.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from the `[http]` config section.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BlogbookError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch a page body as text.
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching text");
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| BlogbookError::Network(format!("{url}: body read failed: {e}")))
    }

    /// Fetch a resource as raw bytes.
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        debug!(%url, "fetching bytes");
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| BlogbookError::Network(format!("{url}: body read failed: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BlogbookError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogbookError::Network(format!("{url}: HTTP {status}")));
        }

        Ok(response)
    }
}
