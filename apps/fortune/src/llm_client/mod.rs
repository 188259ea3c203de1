//! LLM Client: the single point of entry for the hosted inference API.
//!
//! One request per run. No retries: a failed call means no fortune today.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::Config;

pub mod prompts;

use prompts::FORTUNE_PROMPT;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Transport failures and non-200 statuses mean the service had nothing for us.
    /// Anything else means it answered with something we could not read, or the
    /// request could not be built locally (e.g. a token that is not a valid header).
    pub fn is_unavailable(&self) -> bool {
        match self {
            LlmError::Http(e) => !e.is_builder(),
            LlmError::Api { .. } => true,
            LlmError::Parse(_) | LlmError::EmptyContent => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            token: config.hf_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the fortune prompt and returns the first generation's text.
    /// Only a 200 response counts as success.
    pub async fn fetch_fortune(&self) -> Result<String, LlmError> {
        let request_body = InferenceRequest {
            inputs: FORTUNE_PROMPT,
            parameters: InferenceParameters {
                return_full_text: false,
            },
        };

        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    error!("Could not build inference request: {e}");
                }
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            // The inference API reports failures as {"error": "..."}
            let message = serde_json::from_str::<InferenceError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Inference API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_generated_text(&body)
    }
}

/// Reads `[0].generated_text` out of a successful response body.
fn parse_generated_text(body: &str) -> Result<String, LlmError> {
    let generations: Vec<Generation> = serde_json::from_str(body)?;
    generations
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or(LlmError::EmptyContent)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
