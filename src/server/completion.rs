//! Text Completion Route

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct TextCompletionRequest {
    /// The text to complete
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TextCompletionResponse {
    /// The completed text
    pub completion: Option<String>,

    /// The error message, if any
    pub error_message: Option<String>,

    /// Whether the request was successful
    pub success: bool,
}

/// `POST /text-completion/:user_public_id`
pub async fn text_completion(
    State(state): State<AppState>,
    Path(user_public_id): Path<String>,
    Json(request): Json<TextCompletionRequest>,
) -> (StatusCode, Json<TextCompletionResponse>) {
    tracing::info!(user = %user_public_id, "text completion request received");

    let Some(user) = state.upstream.fetch_user(&user_public_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(TextCompletionResponse {
                completion: None,
                error_message: Some("User not found".to_string()),
                success: false,
            }),
        );
    };

    let completion = state.llm.complete(&request.text, Some(&user.name)).await;
    let success = completion.is_success();

    tracing::info!(
        user = %user_public_id,
        success,
        status = completion.status.as_u16(),
        "text completion request completed"
    );

    (
        StatusCode::OK,
        Json(TextCompletionResponse {
            completion: completion.text,
            error_message: None,
            success,
        }),
    )
}
