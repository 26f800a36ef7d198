/// Provider client — the single point of entry for all LLM calls in Siteval.
///
/// ARCHITECTURAL RULE: no other module may call the Anthropic API directly.
/// Endpoints depend on the `Provider` trait so tests can swap in a mock.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::siting::schema::OutputSchema;

pub mod stream;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2048;
/// The provider round-trip is the only unbounded-latency operation in the
/// service, so it gets a hard deadline.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("schema conformance failure: {0}")]
    SchemaConformance(String),

    #[error("provider returned no structured output")]
    EmptyContent,
}

/// Narrow seam over the external model. One invocation submits a prompt plus
/// the declared output schema and yields the raw structured output, or fails.
/// No retries, no cache — each call is independent.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
        model: Option<&str>,
    ) -> Result<Value, ProviderError>;
}

/// Invokes the provider and deserializes the raw output into the typed
/// record declared by `schema`.
pub async fn invoke_as<T: DeserializeOwned>(
    provider: &dyn Provider,
    prompt: &str,
    schema: &OutputSchema,
    model: Option<&str>,
) -> Result<T, ProviderError> {
    let value = provider.invoke(prompt, schema, model).await?;
    serde_json::from_value(value).map_err(|e| ProviderError::SchemaConformance(e.to_string()))
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    tools: Vec<ToolDefinition<'a>>,
    tool_choice: ToolChoice<'a>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    input: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// Extracts the forced tool's input object, which carries the structured
    /// output.
    fn into_tool_input(self) -> Option<Value> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "tool_use")
            .and_then(|b| b.input)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client. The output schema rides along as a forced
/// tool so the provider constrains its own output against it.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model_id: String,
    stream_outputs: bool,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_url: ANTHROPIC_API_URL.to_string(),
            api_key: config.anthropic_api_key.clone(),
            model_id: config.model_id.clone(),
            stream_outputs: config.stream_outputs,
        }
    }

    #[cfg(test)]
    fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Resolves the effective model id, stripping a LiteLLM-style
    /// `anthropic/` prefix so both identifier forms work.
    fn resolve_model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        let id = model.unwrap_or(&self.model_id);
        id.strip_prefix("anthropic/").unwrap_or(id)
    }
}

#[async_trait]
impl Provider for LlmClient {
    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
        model: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let request_body = MessagesRequest {
            model: self.resolve_model(model),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            tools: vec![ToolDefinition {
                name: schema.name,
                description: schema.description,
                input_schema: &schema.json_schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: schema.name,
            },
            stream: self.stream_outputs,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(status.as_u16(), message));
        }

        if self.stream_outputs {
            stream::collect_tool_input(response).await
        } else {
            let parsed: MessagesResponse = response.json().await.map_err(|e| {
                ProviderError::SchemaConformance(format!("malformed provider response: {e}"))
            })?;

            debug!(
                "provider call succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            parsed.into_tool_input().ok_or(ProviderError::EmptyContent)
        }
    }
}

/// Maps a non-success HTTP status to the matching failure kind.
/// 429 and 5xx count as unavailability; other 4xx are request errors.
fn classify_status(status: u16, message: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::Auth(message),
        429 => ProviderError::Unavailable(format!("rate limited: {message}")),
        s if s >= 500 => ProviderError::Unavailable(message),
        s => ProviderError::Api { status: s, message },
    }
}
