//! LLM Provider trait
//!
//! Abstracts the model interface so that different providers can be used
//! interchangeably with the orchestrator.

use anyhow::Result;

use super::types::{AssistantMessage, Message, ToolDefinition};

/// Trait for model clients the orchestrator can drive.
///
/// Providers receive the whole transcript on every call together with the
/// tools bound to the conversation, and answer with exactly one assistant
/// message. Failures are transport errors: the orchestrator does not retry
/// them and hands them to its caller.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the transcript and get the next assistant message.
    async fn complete(
        &self,
        transcript: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AssistantMessage>;

    /// Get the current model name.
    fn model(&self) -> String;

    /// Get the provider name (e.g., "openai", "scripted").
    fn provider_name(&self) -> &str;
}
