//! OpenAI-compatible chat completions client
//!
//! Talks to any endpoint exposing the `/chat/completions` API with function
//! calling (OpenAI, DashScope, vLLM, Ollama, LM Studio, ...), translating
//! between the framework's transcript types and the wire format.
//!
//! # Configuration
//!
//! ```ignore
//! // OPENAI_API_KEY, OPENAI_BASE_URL and MODEL_NAME from the environment
//! let llm = OpenAiCompatibleProvider::from_env()?.with_temperature(0.0);
//! ```

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

use super::provider::LlmProvider;
use super::types::{AssistantMessage, Message, ToolCallRequest, ToolDefinition};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "qwen-coder-turbo";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ChatTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ChatToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatFunctionCall {
    name: String,
    /// JSON-encoded arguments, as the API transmits them
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ChatFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ChatFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn function_type() -> String {
    "function".to_string()
}

// ============================================================================
// Conversion
// ============================================================================

fn to_wire_message(message: &Message) -> ChatMessage {
    match message {
        Message::System { content } => ChatMessage {
            role: "system".to_string(),
            content: Some(content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        },
        Message::Human { content } => ChatMessage {
            role: "user".to_string(),
            content: Some(content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        },
        Message::Assistant(assistant) => ChatMessage {
            role: "assistant".to_string(),
            content: if assistant.content.is_empty() && assistant.has_tool_calls() {
                None
            } else {
                Some(assistant.content.clone())
            },
            tool_calls: assistant
                .tool_calls
                .iter()
                .map(|call| ChatToolCall {
                    id: call.id.clone(),
                    call_type: function_type(),
                    function: ChatFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect(),
            tool_call_id: None,
        },
        Message::ToolResult(result) => ChatMessage {
            role: "tool".to_string(),
            content: Some(result.content.clone()),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.call_id.clone()),
        },
    }
}

/// Parse the JSON-encoded argument string of a tool call.
///
/// Unparsable arguments are kept as a raw string so the invoker reports them
/// back to the model as an argument error instead of failing the request.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("[OpenAI] Tool call arguments are not valid JSON: {}", e);
        Value::String(raw.to_string())
    })
}

fn from_wire_message(message: ChatMessage) -> AssistantMessage {
    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| {
            ToolCallRequest::new(
                call.id,
                call.function.name,
                parse_arguments(&call.function.arguments),
            )
        })
        .collect();

    AssistantMessage {
        content: message.content.unwrap_or_default(),
        tool_calls,
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Provider for OpenAI-compatible chat completion endpoints
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `MODEL_NAME`
    pub fn from_env() -> Result<Self> {
        tracing::info!("Creating OpenAI-compatible provider from environment");

        let api_key =
            env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable not set")?;

        let api_base = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = env::var("MODEL_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        tracing::info!("Using model: {}", model);
        tracing::info!("API base: {}", api_base);

        Ok(Self::new(api_key).with_base_url(api_base).with_model(model))
    }

    /// Create a provider with an explicit API key and default base URL and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL (without the `/chat/completions` suffix)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn build_request<'a>(
        &'a self,
        transcript: &[Message],
        tools: &'a [ToolDefinition],
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: transcript.iter().map(to_wire_message).collect(),
            tools: tools
                .iter()
                .map(|tool| ChatTool {
                    tool_type: "function",
                    function: ChatFunction {
                        name: &tool.name,
                        description: &tool.description,
                        parameters: &tool.parameters,
                    },
                })
                .collect(),
            temperature: self.temperature,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn complete(
        &self,
        transcript: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AssistantMessage> {
        let request = self.build_request(transcript, tools);
        let url = self.completions_url();

        tracing::debug!(
            "[OpenAI] POST {} ({} messages, {} tools)",
            url,
            request.messages.len(),
            request.tools.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat completions API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read chat completions response body")?;

        tracing::debug!("[OpenAI] Response status: {}", status);
        tracing::trace!("[OpenAI] Response body: {}", response_text);

        if !status.is_success() {
            tracing::error!("[OpenAI] API error: {} - {}", status, response_text);
            anyhow::bail!("Chat completions API error ({}): {}", status, response_text);
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .context("Failed to parse chat completions response")?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("Chat completions response contained no choices")?;

        Ok(from_wire_message(choice.message))
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
