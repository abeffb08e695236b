//! Gateway Middleware
//!
//! The authorization gate and the request-timing wrapper.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::server::AppState;

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Authorization gate: the four ordered credential checks, run before
/// every route. The first failing check short-circuits with a 403 and a
/// structured reason.
pub async fn authorization(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let service_key = header_value(&request, &state.auth_headers.service_key);
    let client_name = header_value(&request, &state.auth_headers.client_name);
    let secret_hash = header_value(&request, &state.auth_headers.secret_hash);
    let host = header_value(&request, "host");

    match state.registry.authorize(
        service_key.as_deref(),
        client_name.as_deref(),
        secret_hash.as_deref(),
        host.as_deref(),
    ) {
        Ok(()) => next.run(request).await,
        Err(reason) => {
            tracing::warn!(
                path = %request.uri().path(),
                reason = reason.as_str(),
                "forbidden request"
            );
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "message": "403: Forbidden request!",
                    "reason": reason.as_str(),
                })),
            )
                .into_response()
        }
    }
}

/// Times every request, logs the outcome and stamps `X-Process-Time`.
pub async fn process_timer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_secs = elapsed,
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed)) {
        response.headers_mut().insert("x-process-time", value);
    }

    response
}
