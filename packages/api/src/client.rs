//! Thin HTTP layer shared by the auth and data clients.
//!
//! Every request carries the project's public key as `apikey` and a bearer
//! token: the signed-in user's access token when there is one, the anon key
//! otherwise. Row-level security on the service decides what that token may
//! see or write.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use store::config::BackendConfig;

use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.trim().to_string(),
        }
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// `{base}/rest/v1/{path}`
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `{base}/auth/v1/{path}`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the key headers already set.
    pub fn request(&self, method: Method, url: &str, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {token}"))
    }

    /// Send and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and discard whatever body comes back.
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        check(request.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-success status into [`ApiError::Service`].
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "request failed");
    Err(ApiError::from_response_body(
        status.as_u16(),
        status.canonical_reason(),
        &body,
    ))
}
