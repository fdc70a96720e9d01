//! Shared HTTP client for the ReviewDesk feedback API.
//!
//! Provides a minimal client with configurable auth (Bearer token, X-API-Key
//! or anonymous for public forms), generic GET/PATCH helpers, domain
//! methods (forms, submissions, employees) and the public form session.
//! The CLI and the report gateway use this client directly.

pub mod api;
pub mod public_form;

use anyhow::{Context, Result};
use reqwest::Client;
use reviewdesk_core::{AppError, UpstreamConfig};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    /// No credentials (public form endpoints)
    Anonymous,
}

/// API path prefix: `/api`, or `/api/{version}` when a version is configured.
pub fn api_prefix(version: Option<&str>) -> String {
    match version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => format!("/api/{}", version),
        None => "/api".to_string(),
    }
}

/// Non-success response from the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub status: u16,
    pub message: String,
}

impl UpstreamFailure {
    /// Extract the message from an `{ "error": ... }` / `{ "message": ... }`
    /// body, falling back to the raw text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                ["error", "message"]
                    .iter()
                    .find_map(|key| json.get(key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                }
            });
        Self { status, message }
    }
}

impl From<UpstreamFailure> for AppError {
    fn from(failure: UpstreamFailure) -> Self {
        match failure.status {
            401 | 403 => AppError::Unauthorized(failure.message),
            404 => AppError::NotFound(failure.message),
            400 | 422 => AppError::BadRequest(failure.message),
            status => AppError::Upstream {
                status: Some(status),
                message: failure.message,
            },
        }
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> AppError {
    AppError::Upstream {
        status: err.status().map(|s| s.as_u16()),
        message: format!("Failed to send request: {}", err),
    }
}

/// HTTP client for the feedback API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    prefix: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        Self::with_options(base_url, None, auth, Duration::from_secs(60))
    }

    fn with_options(
        base_url: String,
        api_version: Option<&str>,
        auth: Auth,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: api_prefix(api_version),
            auth,
        })
    }

    pub fn from_config(config: &UpstreamConfig, auth: Auth) -> Result<Self> {
        Self::with_options(
            config.api_url.clone(),
            config.api_version.as_deref(),
            auth,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Create client from environment using Bearer token:
    /// REVIEWDESK_API_KEY, API_KEY or JWT_TOKEN.
    pub fn from_env() -> Result<Self> {
        let config = UpstreamConfig::from_env()?;
        config.validate()?;
        let token = config
            .api_key
            .clone()
            .context("Missing token. Set REVIEWDESK_API_KEY, API_KEY, or JWT_TOKEN")?;
        Self::from_config(&config, Auth::Bearer(token))
    }

    /// Same connection pool and base URL with different credentials.
    pub fn with_auth(&self, auth: Auth) -> Self {
        Self {
            auth,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Prefixed API path for `resource` (e.g. `forms` -> `/api/forms`).
    pub fn api_path(&self, resource: &str) -> String {
        format!("{}/{}", self.prefix, resource.trim_start_matches('/'))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::Anonymous => request,
        }
    }

    /// Send a request. Transport errors are `Err`; non-success statuses are
    /// returned as `Ok(Err(UpstreamFailure))` for the caller to classify.
    pub(crate) async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<std::result::Result<reqwest::Response, UpstreamFailure>, AppError> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ok(response));
        }

        let body = response.text().await.unwrap_or_default();
        let failure = UpstreamFailure::from_body(status.as_u16(), &body);
        tracing::debug!(status = failure.status, message = %failure.message, "API request failed");
        Ok(Err(failure))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        self.dispatch(request).await?.map_err(AppError::from)
    }

    pub(crate) async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        response.json().await.map_err(|e| AppError::Upstream {
            status: None,
            message: format!("Failed to parse response as JSON: {}", e),
        })
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::parse(self.send(request).await?).await
    }

    /// PATCH without a body. Returns Ok(()) on success.
    pub async fn patch(&self, path: &str) -> Result<(), AppError> {
        self.send(self.client.patch(self.build_url(path))).await?;
        Ok(())
    }

    /// Raw client for custom requests; `dispatch` applies auth when sending.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub use api::Listing;
pub use public_form::{FormSession, ReviewLauncher, ReviewPrompt, SubmitState};
