//! HTTP Client
//!
//! Async HTTP client for the LLM backend. A single attempt per call:
//! retry policy lives in the rotation client, which distinguishes
//! transport failures (returned as `Err`) from HTTP-level statuses
//! (returned as `Ok` with the status attached).

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;

use crate::error::{GatewayError, Result};

/// Default connect timeout for outbound calls
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default end-to-end timeout for outbound calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The raw result of one completed HTTP exchange
#[derive(Debug)]
pub struct HttpReply {
    /// Response status
    pub status: StatusCode,

    /// Response body, unparsed
    pub body: String,
}

/// HTTP client with explicit timeouts
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given timeouts
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Make a bearer-authenticated JSON POST.
    ///
    /// `Err` means the exchange never completed (connect failure,
    /// timeout). Any response that did arrive, success or not, comes
    /// back as `Ok` for the caller to classify.
    pub async fn post_json<T: Serialize>(
        &self,
        url: &str,
        api_key: &str,
        body: &T,
    ) -> Result<HttpReply> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| GatewayError::Config(format!("Invalid API key format: {}", e)))?,
        );

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }

    /// Make a plain GET and deserialize the JSON body on 2xx.
    pub async fn get_json<R: serde::de::DeserializeOwned>(&self, url: &str) -> Result<R> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GatewayError::Upstream(format!(
                "GET {} returned status {}",
                url, status
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            GatewayError::Response(format!(
                "Failed to parse response from {}: {}. Body: {}",
                url,
                e,
                &body[..body.len().min(500)]
            ))
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
            .expect("Failed to create default HTTP client")
    }
}
