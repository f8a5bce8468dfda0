//! n8n API client
//!
//! Thin typed layer over a [`Transport`]. Entity specific operations live in
//! the `workflows`, `credentials` and `users` modules.

use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub(crate) const API_PREFIX: &str = "/api/v1";

/// Shared handle to the n8n API. Cloning is cheap and shares the transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client over the default HTTP transport
    pub fn connect(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url, api_key)?)))
    }

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a request and return the raw response body
    pub(crate) async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.transport
            .send(method, &format!("{}{}", API_PREFIX, path), body)
            .await
    }

    /// Send a request and decode the JSON response
    pub(crate) async fn request_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let bytes = self.request(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// Placeholder body type for requests without a payload
pub(crate) const NO_BODY: Option<&()> = None;
