//! Inference client: the single point of entry for calls to the completion endpoint.
//!
//! All model interactions go through this module. The endpoint speaks the
//! OpenAI-style completions shape: `{model, prompt, max_tokens}` in,
//! `{choices: [{text}]}` out. One request per call; failures are returned,
//! never retried.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;

/// Number of prompt characters echoed into debug logs.
const PROMPT_LOG_PREFIX: usize = 100;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("inference request failed (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("inference response has no choices")]
    MalformedResponse,

    #[error("inference returned no text")]
    EmptyResult,

    #[error("prompt is {len} characters, limit is {limit}")]
    PromptTooLong { len: usize, limit: usize },
}

impl InferenceError {
    /// Stable machine-readable code surfaced in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            InferenceError::Transport(_) => "INFERENCE_TRANSPORT",
            InferenceError::InvalidBody(_) => "INFERENCE_INVALID_BODY",
            InferenceError::Status { .. } => "INFERENCE_HTTP_ERROR",
            InferenceError::MalformedResponse => "INFERENCE_MALFORMED_RESPONSE",
            InferenceError::EmptyResult => "INFERENCE_EMPTY_RESULT",
            InferenceError::PromptTooLong { .. } => "PROMPT_TOO_LONG",
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub text: Option<String>,
}

impl CompletionResponse {
    /// Trimmed text of the first choice.
    pub fn first_text(&self) -> Result<&str, InferenceError> {
        let text = self
            .choices
            .first()
            .and_then(|c| c.text.as_deref())
            .ok_or(InferenceError::MalformedResponse)?
            .trim();
        if text.is_empty() {
            return Err(InferenceError::EmptyResult);
        }
        Ok(text)
    }
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    url: String,
    model: String,
    max_tokens: u32,
    max_prompt_chars: usize,
}

impl InferenceClient {
    pub fn new(config: &Config) -> Result<Self, InferenceError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.inference_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.inference_url.clone(),
            model: config.inference_model.clone(),
            max_tokens: config.inference_max_tokens,
            max_prompt_chars: config.max_prompt_chars,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` to the completion endpoint and returns the first
    /// choice's trimmed text.
    pub async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let len = prompt.chars().count();
        if len > self.max_prompt_chars {
            return Err(InferenceError::PromptTooLong {
                len,
                limit: self.max_prompt_chars,
            });
        }

        let request_body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending prompt to model {}: {}...",
            self.model,
            prompt_prefix(prompt)
        );

        let response = self.client.post(&self.url).json(&request_body).send().await?;

        let status = response.status();
        debug!("Response status: {status}");
        let body = response.text().await?;
        debug!("Response body: {body}");

        if status != reqwest::StatusCode::OK {
            error!("Inference endpoint returned {status}: {body}");
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        match parsed.first_text() {
            Ok(text) => Ok(text.to_string()),
            Err(e) => {
                error!("Unusable inference response: {e}");
                Err(e)
            }
        }
    }
}

fn prompt_prefix(prompt: &str) -> &str {
    match prompt.char_indices().nth(PROMPT_LOG_PREFIX) {
        Some((idx, _)) => &prompt[..idx],
        None => prompt,
    }
}
