//! llmgate - Lightweight LLM Gateway
//!
//! A gateway service that authenticates calling services, assembles
//! templated prompts and forwards them to a rotating pool of
//! interchangeable LLM backends.

use axum::http::StatusCode;

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
pub mod router;
pub mod server;
pub mod upstream;

use api::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use client::HttpClient;
use config::LlmSettings;
use error::Result;
use router::ModelPool;

/// The outcome of a completion attempt
///
/// Absent text always means failure, whatever the numeric status says:
/// the transport-exhaustion path reports the last known status, which
/// stays at its initial 200 when no response was ever received.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text, if any
    pub text: Option<String>,

    /// Last HTTP status observed for this request
    pub status: StatusCode,
}

impl Completion {
    /// Whether the completion produced text
    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// The model-rotation completion client
///
/// Selects a backend model round-robin from the shared pool, issues the
/// completion request and retries transport failures with the next model
/// in rotation, up to a bounded retry count.
pub struct CompletionClient {
    settings: LlmSettings,
    pool: ModelPool,
    http: HttpClient,
}

impl CompletionClient {
    /// Create a client over the given model pool
    pub fn new(settings: LlmSettings, models: Vec<String>) -> Result<Self> {
        let http = HttpClient::new(settings.connect_timeout, settings.request_timeout)?;

        Ok(Self {
            pool: ModelPool::new(models)?,
            settings,
            http,
        })
    }

    /// The shared model pool
    pub fn pool(&self) -> &ModelPool {
        &self.pool
    }

    /// Run a completion with the configured retry budget
    pub async fn complete(&self, prompt: &str, caller: Option<&str>) -> Completion {
        self.complete_with_retries(prompt, caller, self.settings.max_retries)
            .await
    }

    /// Run a completion with an explicit retry budget.
    ///
    /// Transport failures rotate to the next model while budget remains;
    /// `max_retries = N` means at most `N + 1` attempts. HTTP error
    /// responses are deterministic and return immediately with their
    /// status. The message list is built fresh for every attempt.
    pub async fn complete_with_retries(
        &self,
        prompt: &str,
        caller: Option<&str>,
        max_retries: u32,
    ) -> Completion {
        let mut status = StatusCode::OK;
        let mut budget = max_retries;

        loop {
            let model = self.pool.next().to_string();
            let payload = self.build_request(&model, prompt, caller);

            match self
                .http
                .post_json(&self.settings.endpoint_url, &self.settings.api_key, &payload)
                .await
            {
                Ok(reply) => {
                    status = reply.status;

                    if status != StatusCode::OK {
                        tracing::warn!(
                            model = %model,
                            status = %status,
                            "model returned an error response"
                        );
                        return Completion { text: None, status };
                    }

                    let parsed: ChatCompletionResponse =
                        serde_json::from_str(&reply.body).unwrap_or_default();

                    return match parsed.content() {
                        Some(text) => Completion {
                            text: Some(text.to_string()),
                            status,
                        },
                        None => {
                            tracing::warn!(
                                model = %model,
                                "model response carried no completion content"
                            );
                            Completion { text: None, status }
                        }
                    };
                }
                Err(err) => {
                    tracing::error!(model = %model, error = %err, "error calling model");

                    if budget == 0 {
                        return Completion { text: None, status };
                    }
                    budget -= 1;
                    tracing::info!(
                        remaining_retries = budget,
                        "retrying completion with the next model in rotation"
                    );
                }
            }
        }
    }

    /// Build the outbound payload for one attempt
    fn build_request(
        &self,
        model: &str,
        prompt: &str,
        caller: Option<&str>,
    ) -> ChatCompletionRequest {
        let mut messages = prompts::preamble();
        if let Some(name) = caller {
            messages.push(ChatMessage::user(format!("Name: {}", name)));
        }
        messages.push(ChatMessage::user(prompt));

        let mut request = ChatCompletionRequest::new(model.to_string(), messages);
        request.max_completion_tokens = Some(self.settings.max_completion_tokens);
        request.temperature = Some(self.settings.temperature);
        request.top_p = Some(self.settings.top_p);
        request.stream = Some(false);
        request
    }
}
