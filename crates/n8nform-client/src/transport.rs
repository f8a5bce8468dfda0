//! HTTP transport for the n8n public API
//!
//! Signs every request with the API key header and classifies responses by
//! status: any 2xx is success, anything else becomes [`ClientError::Api`]
//! carrying the status code and the raw body.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Header carrying the n8n API key
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Fixed per-request timeout. There is no retry on top of it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a single request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Reuse an existing [`reqwest::Client`]. The caller owns its timeout policy.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>> {
        tracing::debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key);

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::debug!("{} {} -> {}", method, path, status.as_u16());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new("https://n8n.example.com/", "key").unwrap();
        assert_eq!(transport.base_url(), "https://n8n.example.com");
        assert_eq!(
            transport.url("/api/v1/workflows"),
            "https://n8n.example.com/api/v1/workflows"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let transport = HttpTransport::new("https://n8n.example.com", "super-secret").unwrap();
        let debug = format!("{:?}", transport);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
