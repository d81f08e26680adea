//! Chat-completions client over reqwest.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Settings,
    error::GenerationError,
    llm::{CompletionRequest, CompletionService},
};

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from settings. Fails if the credential is absent.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?.to_string();
        let client = Client::builder()
            .user_agent("llm-summary-eval/0.1")
            .timeout(settings.request_timeout())
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.api_base.trim_end_matches('/')),
            api_key,
        })
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        debug!(%status, bytes = body.len(), "completion response received");
        parse_completion(&body)
    }
}

/// Extract the top choice's message content from a response body.
pub fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let payload: CompletionResponse =
        serde_json::from_str(body).map_err(|err| GenerationError::Malformed(err.to_string()))?;
    payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenerationError::Malformed("response has no choices".to_string()))
}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 512;
    match body.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
