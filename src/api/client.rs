//! Remote token API client
//!
//! Thin typed wrapper around the sora2api admin endpoints. A 401 from the
//! admin API itself means the admin credential is no longer accepted; that is
//! surfaced as `Ok(None)` so callers can abort an in-progress batch instead
//! of burning through the remaining items.

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{CleanupResponse, TestResponse, ToggleResponse, TokenRecord};

/// Remote admin API surface used by the bulk operations
///
/// `Ok(None)` is the session-level failure signal; `Err` covers per-call
/// transport and body-shape problems.
#[allow(async_fn_in_trait)]
pub trait TokenApi {
    async fn list_tokens(&self) -> anyhow::Result<Option<Vec<TokenRecord>>>;
    async fn test_token(&self, id: i64) -> anyhow::Result<Option<TestResponse>>;
    async fn enable_token(&self, id: i64) -> anyhow::Result<Option<ToggleResponse>>;
    async fn disable_token(&self, id: i64) -> anyhow::Result<Option<ToggleResponse>>;
    async fn cleanup_problematic(&self) -> anyhow::Result<Option<CleanupResponse>>;
}

/// [`TokenApi`] implementation over HTTP
pub struct HttpTokenApi {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpTokenApi {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the JSON body
    ///
    /// A 401 response is the session-level abort signal and yields
    /// `Ok(None)`; any other status is decoded as `T` (the backend reports
    /// operation failures inside the JSON body, not via HTTP status).
    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> anyhow::Result<Option<T>> {
        let resp = req
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Admin API request failed")?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Admin session rejected (401), treating as unrecoverable");
            return Ok(None);
        }

        let status = resp.status();
        let body = resp
            .json::<T>()
            .await
            .with_context(|| format!("Invalid response body (HTTP {})", status))?;
        Ok(Some(body))
    }
}

impl TokenApi for HttpTokenApi {
    async fn list_tokens(&self) -> anyhow::Result<Option<Vec<TokenRecord>>> {
        self.send(self.client.get(self.url("/api/tokens"))).await
    }

    async fn test_token(&self, id: i64) -> anyhow::Result<Option<TestResponse>> {
        tracing::debug!("Testing token #{}", id);
        self.send(self.client.post(self.url(&format!("/api/tokens/{}/test", id))))
            .await
    }

    async fn enable_token(&self, id: i64) -> anyhow::Result<Option<ToggleResponse>> {
        self.send(self.client.post(self.url(&format!("/api/tokens/{}/enable", id))))
            .await
    }

    async fn disable_token(&self, id: i64) -> anyhow::Result<Option<ToggleResponse>> {
        self.send(self.client.post(self.url(&format!("/api/tokens/{}/disable", id))))
            .await
    }

    async fn cleanup_problematic(&self) -> anyhow::Result<Option<CleanupResponse>> {
        self.send(self.client.delete(self.url("/api/tokens/problematic/cleanup")))
            .await
    }
}
