use std::time::Duration;

use async_trait::async_trait;
use rand::{thread_rng, Rng};
use reqwest::{Client, StatusCode};

use crate::error::ClientError;
use crate::services::ai_types::{ChatMessage, ChatRequest, ChatResponse, ResponseSchema};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const MAX_RETRIES: usize = 2;
const BASE_DELAY_MS: u64 = 800;
const TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f32 = 0.2;

/// A generative model that answers with JSON matching a schema.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Returns the raw completion content, `None` when the model sent none.
    async fn complete(
        &self,
        system_prompt: &str,
        user_input: &str,
        schema: &ResponseSchema,
    ) -> Result<Option<String>, ClientError>;
}

/// Chat-completions client for OpenAI-compatible services.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> Result<ChatResponse, ClientError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();

        // Read as text first so error bodies survive a JSON failure.
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_input: &str,
        schema: &ResponseSchema,
    ) -> Result<Option<String>, ClientError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_input,
                },
            ],
            temperature: TEMPERATURE,
            n: 1,
            response_format: schema.response_format(),
        };

        let mut attempt = 0;
        let response = loop {
            match self.send_once(&body).await {
                Ok(response) => break response,
                Err(err) if attempt < MAX_RETRIES && is_transient(&err) => {
                    tracing::debug!(attempt, error = %err, "retrying model request");
                    tokio::time::sleep(backoff(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        };

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

fn backoff(attempt: usize) -> Duration {
    let jitter: u64 = thread_rng().gen_range(0..200);
    let ms = BASE_DELAY_MS * 2_u64.pow(attempt as u32) + jitter;
    Duration::from_millis(ms)
}

fn is_transient(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => e.is_timeout() || e.is_connect(),
        ClientError::Status { status, .. } => StatusCode::from_u16(*status)
            .map(should_retry_http)
            .unwrap_or(false),
        ClientError::Decode(_) => false,
    }
}

fn should_retry_http(status: StatusCode) -> bool {
    // 408/429/5xx are usually temporary
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

/// Pulls `error.message` or `message` out of an error body, else a snippet.
fn extract_error_message(body_text: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body_text.trim();
    match trimmed.char_indices().nth(400) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
