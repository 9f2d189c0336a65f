//! HTTP contract with the conversational-agent backend
//!
//! The backend is an external service; this module only knows the five
//! JSON calls it exposes. Every call is a single attempt: no retry, no
//! caching. Transport failures, non-2xx statuses and undecodable bodies are
//! all returned as [`RivetError`] values.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::types::*;
use crate::{Result, RivetError};

/// The backend calls the front-end depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /options`
    async fn fetch_options(&self) -> Result<OptionsResponse>;

    /// `POST /save`
    async fn save_configuration(&self, request: &SaveRequest) -> Result<MessageResponse>;

    /// `POST /start` (legacy startup screen)
    async fn start_configuration(&self, request: &StartRequest) -> Result<MessageResponse>;

    /// `GET /configs`
    async fn list_configurations(&self) -> Result<ConfigsResponse>;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// reqwest-backed implementation of [`BackendApi`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for the backend described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.backend_url.clone()))
    }

    /// Create from an existing client and base URL
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// Base URL every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RivetError::config(format!("Cannot build URL for {}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {} body={}", url, serde_json::to_string(body)?);
        let response = self.client.post(url).json(body).send().await?;
        decode(path, response).await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Backend {} answered {}: {}", path, status, body);
        return Err(RivetError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response.bytes().await?;
    let parsed = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(
            "Backend {} sent an unexpected body ({} bytes): {}",
            path,
            bytes.len(),
            e
        );
        e
    })?;
    Ok(parsed)
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_options(&self) -> Result<OptionsResponse> {
        self.get_json("/options").await
    }

    async fn save_configuration(&self, request: &SaveRequest) -> Result<MessageResponse> {
        self.post_json("/save", request).await
    }

    async fn start_configuration(&self, request: &StartRequest) -> Result<MessageResponse> {
        self.post_json("/start", request).await
    }

    async fn list_configurations(&self) -> Result<ConfigsResponse> {
        self.get_json("/configs").await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post_json("/chat", request).await
    }
}
