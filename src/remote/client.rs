//! Remote server HTTP client
//!
//! Async client for the Hae server API. Every request carries a fresh
//! bearer token from the auth collaborator and the client timezone.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::types::*;
use crate::auth::AuthProvider;
use crate::config::ServerConfig;
use crate::core::backend::MemoryBackend;

/// HTTP client for the Hae server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn AuthProvider>,
}

impl ApiClient {
    /// Create new client from server config
    pub fn from_config(config: &ServerConfig, auth: Arc<dyn AuthProvider>) -> Result<Self> {
        let url = config.url.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Server URL not configured. Set server.url in config or use --server-url flag."
            )
        })?;

        Self::new(url, auth, config.timeout_secs)
    }

    /// Create new client with explicit parameters
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, timeout_secs: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url, auth })
    }

    /// Build a URL for an endpoint
    fn url(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Attach the timezone header and a fresh bearer token
    async fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("X-Timezone", timezone_offset());
        match self.auth.id_token().await {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Check server health
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        let url = self.url("/health")?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Handle response and deserialize; non-success statuses become
    /// `ApiError::Server` carrying the server-provided detail
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> ApiResult<T> {
        let status = resp.status();

        if !status.is_success() {
            let detail = Self::extract_error(resp).await;
            tracing::warn!(%status, %detail, "server returned an error");
            return Err(ApiError::Server { status, detail });
        }

        Ok(resp.json().await?)
    }

    /// Extract error detail from a response body
    async fn extract_error(resp: reqwest::Response) -> String {
        match resp.json::<ApiErrorResponse>().await {
            Ok(body) => body.detail(),
            Err(_) => "Unknown error".to_string(),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url.as_str()).finish()
    }
}

#[async_trait]
impl MemoryBackend for ApiClient {
    async fn list_networks(&self) -> ApiResult<Vec<Network>> {
        let url = self.url("/networks")?;
        let resp = self.authed(self.client.get(url)).await.send().await?;
        self.handle_response(resp).await
    }

    async fn delete_network(&self, nid: i64) -> ApiResult<MessageResponse> {
        let url = self.url(&format!("/networks/{}", nid))?;
        let resp = self.authed(self.client.delete(url)).await.send().await?;
        self.handle_response(resp).await
    }

    async fn rename_network(&self, nid: i64, name: &str) -> ApiResult<MessageResponse> {
        let url = self.url(&format!("/networks/{}/name", nid))?;
        let req = RenameRequest { name: name.to_string() };
        let resp = self.authed(self.client.put(url)).await.json(&req).send().await?;
        self.handle_response(resp).await
    }

    async fn list_contents(&self, nid: i64) -> ApiResult<Vec<Content>> {
        let url = self.url(&format!("/networks/{}/contents", nid))?;
        let resp = self.authed(self.client.get(url)).await.send().await?;
        self.handle_response(resp).await
    }

    async fn update_content(&self, nid: i64, cid: i64, content: &str) -> ApiResult<Content> {
        let url = self.url(&format!("/networks/{}/contents/{}", nid, cid))?;
        let req = UpdateContentRequest { content: content.to_string() };
        let resp = self.authed(self.client.put(url)).await.json(&req).send().await?;
        self.handle_response(resp).await
    }

    async fn delete_content(&self, nid: i64, cid: i64) -> ApiResult<MessageResponse> {
        let url = self.url(&format!("/networks/{}/contents/{}", nid, cid))?;
        let resp = self.authed(self.client.delete(url)).await.send().await?;
        self.handle_response(resp).await
    }

    async fn save(&self, req: &SaveRequest) -> ApiResult<MessageResponse> {
        let url = self.url("/save")?;
        let resp = self.authed(self.client.post(url)).await.json(req).send().await?;
        self.handle_response(resp).await
    }

    async fn query(&self, req: &QueryRequest) -> ApiResult<QueryResponse> {
        let url = self.url("/query")?;
        let resp = self.authed(self.client.post(url)).await.json(req).send().await?;
        self.handle_response(resp).await
    }

    async fn determine_action(&self, text: &str) -> ApiResult<ActionResponse> {
        let url = self.url("/determine_action")?;
        let req = ActionRequest { text: text.to_string() };
        let resp = self.authed(self.client.post(url)).await.json(&req).send().await?;
        self.handle_response(resp).await
    }
}

/// Client UTC offset, e.g. "+02:00"
fn timezone_offset() -> String {
    chrono::Local::now().format("%:z").to_string()
}
