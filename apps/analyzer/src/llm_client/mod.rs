//! LLM Client: the single point of entry for all model calls in the analyzer.
//!
//! ARCHITECTURAL RULE: No other module may call the model endpoint directly.
//! All LLM interactions MUST go through this module.
//!
//! Speaks the OpenAI-compatible chat completions protocol, which Gemini exposes
//! under `/v1beta/openai`. Temperature is pinned to 0.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::errors::AppError;

pub mod prompts;

const TEMPERATURE: f32 = 0.0;

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

/// A named JSON schema the model output must conform to.
#[derive(Debug, Clone, Copy)]
pub struct OutputSchema<'a> {
    pub name: &'a str,
    pub schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

// Gemini wraps errors in a list, OpenAI in an object; both carry `error.message`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorEnvelope {
    Single { error: ApiErrorBody },
    List(Vec<ApiErrorEnvelope>),
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ApiErrorEnvelope {
    fn message(self) -> Option<String> {
        match self {
            ApiErrorEnvelope::Single { error } => Some(error.message),
            ApiErrorEnvelope::List(list) => list.into_iter().find_map(|e| e.message()),
        }
    }
}

/// The single LLM client shared by every extraction call in a run.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    completions_url: String,
}

impl LlmClient {
    /// Fails with `MissingCredential` when the key is blank, before any file is processed.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if config.google_api_key.trim().is_empty() {
            return Err(AppError::MissingCredential("GOOGLE_API_KEY".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.llm_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.google_api_key.clone(),
            model: config.llm_model.clone(),
            completions_url: format!("{}/chat/completions", config.llm_base_url),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single call to the model, returning the full response object.
    /// No retries: a transport or API error is returned to the caller as-is.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        schema: Option<OutputSchema<'_>>,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: schema.map(|s| ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: s.name,
                    schema: s.schema,
                    strict: true,
                },
            }),
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(ApiErrorEnvelope::message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(llm_response)
    }

    /// Calls the model and deserializes the text response as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        schema: Option<OutputSchema<'_>>,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, schema).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}
