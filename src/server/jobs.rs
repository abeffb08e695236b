//! Job Categorization Route

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::prompts::templates;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct JobData {
    pub public_id: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct JobCategorizationRequest {
    /// The jobs to categorize
    #[serde(default)]
    pub data: Vec<JobData>,
}

#[derive(Debug, Serialize)]
pub struct JobResponseData {
    pub public_id: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct JobCategorizationResponse {
    /// The categorized jobs
    pub data: Vec<JobResponseData>,

    /// The error message, if any
    pub error_message: Option<String>,

    /// Whether the request was successful
    pub success: bool,
}

/// Strip `<...>` tag spans, trim and lowercase a model completion so it
/// can be compared against category slugs.
fn normalize_completion(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_lowercase()
}

/// `POST /jobs/categorization/`
pub async fn categorize(
    State(state): State<AppState>,
    Json(request): Json<JobCategorizationRequest>,
) -> (StatusCode, Json<JobCategorizationResponse>) {
    let categories = state.upstream.categories().await;
    let slugs: Vec<String> = categories.iter().map(|c| c.slug.clone()).collect();

    let mut data = Vec::new();
    for job in &request.data {
        let prompt = templates::job_categorization(&job.description, &slugs);
        let completion = state.llm.complete(&prompt, None).await;

        let Some(text) = completion.text else {
            tracing::error!(
                job = %job.public_id,
                status = completion.status.as_u16(),
                "categorization completion failed"
            );
            continue;
        };

        let guess = normalize_completion(&text);
        if guess.is_empty() {
            continue;
        }

        if let Some(category) = categories.iter().find(|c| c.slug.contains(&guess)) {
            data.push(JobResponseData {
                public_id: job.public_id.clone(),
                category: category.slug.clone(),
            });
        }
    }

    tracing::info!(
        requested = request.data.len(),
        categorized = data.len(),
        "job categorization completed"
    );

    (
        StatusCode::OK,
        Json(JobCategorizationResponse {
            data,
            error_message: None,
            success: true,
        }),
    )
}
