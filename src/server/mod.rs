//! Server Module
//!
//! The axum application: shared state, middleware stack and routes.

pub mod completion;
pub mod generation;
pub mod health;
pub mod jobs;
pub mod middleware;

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::ServiceRegistry;
use crate::config::{AuthHeaderNames, GatewayConfig};
use crate::error::{GatewayError, Result};
use crate::upstream::UpstreamClient;
use crate::CompletionClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<CompletionClient>,
    pub registry: Arc<ServiceRegistry>,
    pub auth_headers: Arc<AuthHeaderNames>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Build the state graph from a loaded configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            llm: Arc::new(CompletionClient::new(
                config.llm.clone(),
                config.models.clone(),
            )?),
            registry: Arc::new(ServiceRegistry::new(config.services.clone())),
            auth_headers: Arc::new(config.auth_headers.clone()),
            upstream: Arc::new(UpstreamClient::new(config.upstream.clone())?),
        })
    }
}

/// Build the gateway router with the full middleware stack.
///
/// Layer order, outermost first: CORS, HTTP trace, request timer,
/// authorization gate. Rejected requests are still timed and carry CORS
/// headers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health/", get(health::healthcheck))
        .route(
            "/text-completion/:user_public_id",
            post(completion::text_completion),
        )
        .route(
            "/actions/generation/:user_public_id",
            post(generation::generate),
        )
        .route("/jobs/categorization/", post(jobs::categorize))
        .layer(from_fn_with_state(state.clone(), middleware::authorization))
        .layer(from_fn(middleware::process_timer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the application, nested under the configured API prefix
pub fn build_app(state: AppState, api_prefix: &str) -> Router {
    let router = build_router(state);
    if api_prefix.is_empty() || api_prefix == "/" {
        router
    } else {
        Router::new().nest(api_prefix, router)
    }
}

/// Bind the listener and serve until shutdown
pub async fn serve(config: GatewayConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app_name = config.server.app_name.clone();
    let api_prefix = config.server.api_prefix.clone();

    let state = AppState::from_config(&config)?;
    tracing::debug!(
        services = state.registry.len(),
        allowed_hosts = ?state.registry.hosts(),
        "service registry loaded"
    );
    let app = build_app(state, &api_prefix);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GatewayError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(app = %app_name, addr = %addr, prefix = %api_prefix, "gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ServiceEntry;
    use crate::config::{LlmSettings, UpstreamSettings};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::ServiceExt;

    const SERVICE_KEY: &str = "GW-test-key";
    const CLIENT_NAME: &str = "TALENT_WEB";
    const SECRET_HASH: &str = "web_secret";
    const HOST: &str = "talent.example.com";

    fn state(base_url: &str) -> AppState {
        let mut services = HashMap::new();
        services.insert(
            SERVICE_KEY.to_string(),
            ServiceEntry {
                host: HOST.to_string(),
                client_name: CLIENT_NAME.to_string(),
                secret_hash: SECRET_HASH.to_string(),
            },
        );

        let llm = LlmSettings {
            endpoint_url: format!("{}/v1/chat/completions", base_url),
            api_key: "sk-test".to_string(),
            max_retries: 0,
            max_completion_tokens: 256,
            temperature: 0.6,
            top_p: 0.95,
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        };

        AppState {
            llm: Arc::new(CompletionClient::new(llm, vec!["test-model".to_string()]).unwrap()),
            registry: Arc::new(ServiceRegistry::new(services)),
            auth_headers: Arc::new(AuthHeaderNames::default()),
            upstream: Arc::new(
                UpstreamClient::new(UpstreamSettings {
                    auth_server_api: base_url.to_string(),
                    backend_server_api: base_url.to_string(),
                })
                .unwrap(),
            ),
        }
    }

    fn authed(request: axum::http::request::Builder) -> axum::http::request::Builder {
        request
            .header("host", HOST)
            .header("x-llm-service-key", SERVICE_KEY)
            .header("x-llm-service-client", CLIENT_NAME)
            .header("x-llm-secret-hash", SECRET_HASH)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn gate_rejects_missing_service_key() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/")
                    .header("host", HOST)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["message"], "403: Forbidden request!");
        assert_eq!(body["reason"], "invalid llm service key provided");
    }

    #[tokio::test]
    async fn gate_rejects_wrong_secret_hash() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/")
                    .header("host", HOST)
                    .header("x-llm-service-key", SERVICE_KEY)
                    .header("x-llm-service-client", CLIENT_NAME)
                    .header("x-llm-secret-hash", "wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["reason"], "invalid secret hash provided");
    }

    #[tokio::test]
    async fn gate_rejects_wrong_client_name() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/")
                    .header("host", HOST)
                    .header("x-llm-service-key", SERVICE_KEY)
                    .header("x-llm-service-client", "WRONG")
                    .header("x-llm-secret-hash", SECRET_HASH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["reason"], "invalid service-client provided");
    }

    #[tokio::test]
    async fn gate_rejects_foreign_host() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/")
                    .header("host", "evil.example.com")
                    .header("x-llm-service-key", SERVICE_KEY)
                    .header("x-llm-service-client", CLIENT_NAME)
                    .header("x-llm-secret-hash", SECRET_HASH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["reason"], "invalid host origin");
    }

    #[tokio::test]
    async fn authorized_requests_reach_the_handler() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(authed(Request::builder().uri("/health/")).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-process-time"));
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "API is running");
    }

    #[tokio::test]
    async fn rejections_are_timed_too() {
        let app = build_router(state("http://127.0.0.1:9"));
        let response = app
            .oneshot(Request::builder().uri("/health/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().contains_key("x-process-time"));
    }

    #[tokio::test]
    async fn text_completion_returns_404_for_unknown_users() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/auth/ghost/")
            .with_status(404)
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        let response = app
            .oneshot(
                authed(Request::builder().method("POST").uri("/text-completion/ghost"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"text": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_message"], "User not found");
    }

    #[tokio::test]
    async fn text_completion_happy_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/auth/usr-1/")
            .with_status(200)
            .with_body(
                r#"{
                    "name": "Ada",
                    "email": "ada@example.com",
                    "public_id": "usr-1",
                    "is_active": true,
                    "email_verified": true,
                    "complete_profile": true
                }"#,
            )
            .create_async()
            .await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "done"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        let response = app
            .oneshot(
                authed(Request::builder().method("POST").uri("/text-completion/usr-1"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"text": "finish this"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["completion"], "done");
    }

    #[tokio::test]
    async fn generation_rejects_unknown_template_names() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/auth/usr-1/")
            .with_status(200)
            .with_body(
                r#"{
                    "name": "Ada",
                    "email": "ada@example.com",
                    "public_id": "usr-1",
                    "is_active": true,
                    "email_verified": true,
                    "complete_profile": true
                }"#,
            )
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        let response = app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/actions/generation/usr-1"),
                )
                .header("content-type", "application/json")
                .body(Body::from(r#"{"data": {}, "template_name": "cover_letter"}"#))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_message"], "Invalid template name");
    }

    #[tokio::test]
    async fn generation_returns_429_when_the_template_cannot_build() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/auth/usr-1/")
            .with_status(200)
            .with_body(
                r#"{
                    "name": "Ada",
                    "email": "ada@example.com",
                    "public_id": "usr-1",
                    "is_active": true,
                    "email_verified": true,
                    "complete_profile": true
                }"#,
            )
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        // talent_bio needs a profile object; an empty payload cannot build.
        let response = app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/actions/generation/usr-1"),
                )
                .header("content-type", "application/json")
                .body(Body::from(r#"{"data": {}, "template_name": "talent_bio"}"#))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_message"], "Failed to generate completion");
    }

    #[tokio::test]
    async fn generation_requires_a_known_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/auth/ghost/")
            .with_status(404)
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        let response = app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/actions/generation/ghost"),
                )
                .header("content-type", "application/json")
                .body(Body::from(r#"{"data": {}, "template_name": "talent_bio"}"#))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error_message"], "Forbidden: User not found");
    }

    #[tokio::test]
    async fn categorization_matches_completions_to_slugs() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/categories?scraper=true")
            .with_status(200)
            .with_body(
                r#"[
                    {"slug": "web-development", "description": "Web work"},
                    {"slug": "design", "description": "Design work"}
                ]"#,
            )
            .create_async()
            .await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "<p>Design</p>"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let app = build_router(state(&server.url()));
        let response = app
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/jobs/categorization/"),
                )
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"data": [{"public_id": "job-1", "description": "Logo and brand design"}]}"#,
                ))
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["public_id"], "job-1");
        assert_eq!(body["data"][0]["category"], "design");
    }
}
