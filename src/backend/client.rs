//! Canvas backend HTTP client with timeout and error handling.
//!
//! # Responsibilities
//! - Resolve backend endpoints against the configured base URL
//! - Fetch the grid as raw bytes
//! - Forward draw payloads as JSON
//! - Classify transport failures, timeouts and non-2xx statuses

use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{BackendConfig, TimeoutConfig};
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;

/// Backend path serving the grid bitmap.
pub const GRID_PATH: &str = "/api/grid";
/// Backend path accepting draw requests.
pub const DRAW_PATH: &str = "/api/draw";

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The configured base URL could not be used.
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection refused, DNS failure or the transport broke mid-request.
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// No complete response within the configured request timeout.
    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: StatusCode, body: Bytes },

    /// The response body could not be read.
    #[error("failed to read backend response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl BackendClient {
    /// Create a client for the configured backend.
    pub fn new(config: &BackendConfig, timeouts: &TimeoutConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| BackendError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let request_timeout = Duration::from_secs(timeouts.backend_request_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.backend_connect_secs))
            .timeout(request_timeout)
            .no_proxy()
            .build()
            .map_err(BackendError::Client)?;

        tracing::info!(
            base_url = %base_url,
            connect_timeout_secs = timeouts.backend_connect_secs,
            request_timeout_secs = timeouts.backend_request_secs,
            "Backend client initialized"
        );

        Ok(Self {
            http,
            base_url,
            request_timeout,
        })
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    /// `GET {base}/api/grid`, returning the body unmodified.
    pub async fn fetch_grid(&self, request_id: &HeaderValue) -> Result<Bytes, BackendError> {
        let request = self.http.get(self.endpoint(GRID_PATH));
        self.send("grid", request, request_id).await
    }

    /// `POST {base}/api/draw` with `payload` as the JSON body.
    pub async fn submit_draw(
        &self,
        payload: &Value,
        request_id: &HeaderValue,
    ) -> Result<Bytes, BackendError> {
        let request = self.http.post(self.endpoint(DRAW_PATH)).json(payload);
        self.send("draw", request, request_id).await
    }

    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
        request_id: &HeaderValue,
    ) -> Result<Bytes, BackendError> {
        let result = self.execute(request.header(X_REQUEST_ID, request_id.clone())).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(BackendError::Timeout(_)) => "timeout",
            Err(BackendError::Status { .. }) => "status",
            Err(_) => "unreachable",
        };
        metrics::record_backend_call(endpoint, outcome);

        result
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Bytes, BackendError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.request_timeout)
            } else {
                BackendError::Body(e)
            }
        })?;

        if !status.is_success() {
            return Err(BackendError::Status { status, body });
        }

        Ok(body)
    }

    fn classify(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout(self.request_timeout)
        } else {
            BackendError::Unreachable(error)
        }
    }
}
