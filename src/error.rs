//! Gateway Error Types
//!
//! Error handling for configuration, outbound LLM calls and upstream
//! service lookups.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Main error type for gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration errors (invalid JSON, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model pool was configured empty
    #[error("Model pool is empty. Configure at least one model in services.json or LLM_MODELS")]
    EmptyModelPool,

    /// HTTP request failed at the transport level (connect, reset)
    #[error("Request failed: {0}")]
    Request(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response parsing failed
    #[error("Response error: {0}")]
    Response(String),

    /// A backend/auth upstream call failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Whether this error is a transport-level failure worth retrying
    /// against another model. HTTP-level errors arrive as statuses, not
    /// as this type, so only connect/timeout failures qualify.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Request(_) | GatewayError::Timeout(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else if err.is_connect() {
            GatewayError::Request(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            GatewayError::Response(format!("Failed to decode response: {}", err))
        } else {
            GatewayError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Response(format!("JSON parsing error: {}", err))
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Config(format!("IO error: {}", err))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error_message": "Internal server error",
            })),
        )
            .into_response()
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
