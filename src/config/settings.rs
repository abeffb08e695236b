//! Gateway Settings
//!
//! Typed configuration for the server, the outbound LLM path, the auth
//! header names and the upstream services. Everything is resolved once
//! at startup and held immutably for the process lifetime.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::ServiceEntry;
use crate::error::{GatewayError, Result};

/// On-disk registry schema (`services.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Allowed services keyed by service key
    #[serde(default)]
    pub services: HashMap<String, ServiceEntry>,

    /// Ordered model pool
    #[serde(default)]
    pub models: Vec<String>,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Application name, used in startup logs
    pub app_name: String,

    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Path prefix all routes are nested under
    pub api_prefix: String,
}

/// Outbound LLM settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Chat-completions endpoint URL
    pub endpoint_url: String,

    /// Bearer token for the endpoint
    pub api_key: String,

    /// Retry budget for transport failures
    pub max_retries: u32,

    /// Completion token cap sent with every request
    pub max_completion_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Top-p sampling
    pub top_p: f32,

    /// Connect timeout for outbound calls
    pub connect_timeout: Duration,

    /// End-to-end timeout for outbound calls
    pub request_timeout: Duration,
}

/// Names of the three authentication headers
#[derive(Debug, Clone)]
pub struct AuthHeaderNames {
    /// Header carrying the service key
    pub service_key: String,

    /// Header carrying the client name
    pub client_name: String,

    /// Header carrying the secret hash
    pub secret_hash: String,
}

impl Default for AuthHeaderNames {
    fn default() -> Self {
        Self {
            service_key: "x-llm-service-key".to_string(),
            client_name: "x-llm-service-client".to_string(),
            secret_hash: "x-llm-secret-hash".to_string(),
        }
    }
}

/// Upstream service endpoints
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Auth server base URL (user lookups)
    pub auth_server_api: String,

    /// Backend server base URL (category list)
    pub backend_server_api: String,
}

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub auth_headers: AuthHeaderNames,
    pub upstream: UpstreamSettings,

    /// Allowed services keyed by service key
    pub services: HashMap<String, ServiceEntry>,

    /// Ordered model pool
    pub models: Vec<String>,
}

/// Environment lookup used during resolution; injectable for tests
pub(crate) type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn get_str(env: EnvLookup, key: &str, default: &str) -> String {
    env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_parsed<T: std::str::FromStr>(env: EnvLookup, key: &str, default: T) -> Result<T> {
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::Config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}

impl ServerSettings {
    pub(crate) fn resolve(env: EnvLookup) -> Result<Self> {
        Ok(Self {
            app_name: get_str(env, "APP_NAME", "LLM Gateway"),
            host: get_str(env, "HOST", "0.0.0.0"),
            port: get_parsed(env, "PORT", 8080)?,
            api_prefix: get_str(env, "API_PREFIX", "/api"),
        })
    }
}

impl LlmSettings {
    pub(crate) fn resolve(env: EnvLookup) -> Result<Self> {
        let api_key = env("LLM_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                GatewayError::Config("LLM_API_KEY environment variable is required".to_string())
            })?;

        Ok(Self {
            endpoint_url: get_str(
                env,
                "LLM_URL",
                "https://api.cerebras.ai/v1/chat/completions",
            ),
            api_key,
            max_retries: get_parsed(env, "LLM_MAX_RETRIES", 3)?,
            max_completion_tokens: get_parsed(env, "LLM_MAX_COMPLETION_TOKENS", 40960)?,
            temperature: get_parsed(env, "LLM_TEMPERATURE", 0.6)?,
            top_p: get_parsed(env, "LLM_TOP_P", 0.95)?,
            connect_timeout: Duration::from_secs(get_parsed(
                env,
                "LLM_CONNECT_TIMEOUT_SECS",
                10,
            )?),
            request_timeout: Duration::from_secs(get_parsed(
                env,
                "LLM_REQUEST_TIMEOUT_SECS",
                60,
            )?),
        })
    }
}

impl AuthHeaderNames {
    pub(crate) fn resolve(env: EnvLookup) -> Self {
        let defaults = Self::default();
        // Header lookups are case-insensitive; store lowercase.
        Self {
            service_key: get_str(env, "LLM_SERVICE_KEY_HEADER", &defaults.service_key)
                .to_lowercase(),
            client_name: get_str(env, "LLM_SERVICE_CLIENT_HEADER", &defaults.client_name)
                .to_lowercase(),
            secret_hash: get_str(env, "LLM_SECRET_HASH_HEADER", &defaults.secret_hash)
                .to_lowercase(),
        }
    }
}

impl UpstreamSettings {
    pub(crate) fn resolve(env: EnvLookup) -> Self {
        Self {
            auth_server_api: get_str(env, "AUTH_SERVER_API", "http://127.0.0.1:8000/api"),
            backend_server_api: get_str(env, "BACKEND_SERVER_API", "http://127.0.0.1:8000/api"),
        }
    }
}
