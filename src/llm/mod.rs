pub mod openai;
pub mod provider;
pub mod scripted;
pub mod types;

pub use openai::OpenAiCompatibleProvider;
pub use provider::LlmProvider;
pub use scripted::ScriptedProvider;
pub use types::{AssistantMessage, Message, ToolCallRequest, ToolDefinition, ToolResult};
