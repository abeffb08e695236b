//! Prompt Generation Route

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::prompts::TemplateName;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct PromptGenerationRequest {
    /// The data required to generate the prompt
    #[serde(default)]
    pub data: serde_json::Value,

    /// The name of the prompt template to use
    #[serde(default)]
    pub template_name: String,
}

#[derive(Debug, Serialize)]
pub struct PromptGenerationResponse {
    /// The generated text
    pub completion: Option<String>,

    /// The error message, if any
    pub error_message: Option<String>,

    /// Whether the generation was successful
    pub success: bool,
}

fn failure(message: &str) -> PromptGenerationResponse {
    PromptGenerationResponse {
        completion: None,
        error_message: Some(message.to_string()),
        success: false,
    }
}

/// `POST /actions/generation/:user_public_id`
pub async fn generate(
    State(state): State<AppState>,
    Path(user_public_id): Path<String>,
    Json(request): Json<PromptGenerationRequest>,
) -> (StatusCode, Json<PromptGenerationResponse>) {
    // Validate the user exists
    let Some(user) = state.upstream.fetch_user(&user_public_id).await else {
        return (
            StatusCode::FORBIDDEN,
            Json(failure("Forbidden: User not found")),
        );
    };

    // Validate the template name
    let Ok(template) = request.template_name.parse::<TemplateName>() else {
        return (StatusCode::OK, Json(failure("Invalid template name")));
    };

    // Build the prompt from the template and request data
    let Some(prompt) = template.build(&request.data, &user) else {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(failure("Failed to generate completion")),
        );
    };

    let completion = state.llm.complete(&prompt, Some(&user.name)).await;
    let success = completion.is_success();

    tracing::info!(
        user = %user_public_id,
        template = %request.template_name,
        success,
        "generation request completed"
    );

    (
        StatusCode::OK,
        Json(PromptGenerationResponse {
            completion: completion.text,
            error_message: None,
            success,
        }),
    )
}
