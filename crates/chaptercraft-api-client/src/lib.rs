//! Shared HTTP client for the Chaptercraft backend.
//!
//! One `ApiClient` is built per process from [`ClientConfig`] and cloned into
//! every view. Clones share the same session credential: after
//! [`ApiClient::set_bearer`] every request carries `Authorization: Bearer`,
//! after [`ApiClient::clear_auth`] none does. Non-success responses become
//! [`AppError`]s with the message extracted from the body.

pub mod admin;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod files;
pub mod generation;
pub mod progress;
pub mod projects;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chaptercraft_core::constants::API_PREFIX;
use chaptercraft_core::{AppError, AppResult, ClientConfig};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Authentication attached to outgoing requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// Build an `/api/...` path from a route suffix.
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Percent-encode one path segment (project ids, session ids, genres).
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// HTTP client for the Chaptercraft API with a shared, swappable credential.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Arc<RwLock<Option<Auth>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!(base_url = %base_url, "API client created");

        Ok(Self {
            client,
            base_url,
            auth: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::new(&config.api_url, config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `token` to every subsequent request from this client and its clones.
    pub fn set_bearer(&self, token: &str) {
        let mut auth = self.auth.write().unwrap_or_else(PoisonError::into_inner);
        *auth = Some(Auth::Bearer(token.to_string()));
    }

    /// Stop attaching credentials.
    pub fn clear_auth(&self) {
        let mut auth = self.auth.write().unwrap_or_else(PoisonError::into_inner);
        *auth = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        let auth = self.auth.read().unwrap_or_else(PoisonError::into_inner);
        match auth.as_ref() {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            None => request,
        }
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> AppResult<String> {
        let request = self.apply_auth(request);

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request could not be sent");
            AppError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let err = AppError::from_response(status.as_u16(), &body);
            err.log("API request failed");
            return Err(err);
        }

        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            AppError::UnexpectedResponse(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute_json(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> AppResult<T> {
        let mut request = self.client.post(self.build_url(path)).json(body);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute_json(request).await
    }

    /// POST with query parameters only.
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(path)).query(query);
        self.execute_json(request).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let request = self.client.put(self.build_url(path)).json(body);
        self.execute_json(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        self.execute_json(request).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let request = self.client.delete(self.build_url(path));
        self.execute(request).await.map(|_| ())
    }
}
