//! Provider-neutral conversation types
//!
//! These types are what the orchestrator and the tools see. Providers that
//! speak a particular wire format translate to and from them internally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Messages
// ============================================================================

/// A unit of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Static instructions, at most once and always first
    System { content: String },

    /// User input
    Human { content: String },

    /// Model output, optionally carrying tool-call requests
    Assistant(AssistantMessage),

    /// Output of one previously requested tool call
    ToolResult(ToolResult),
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a human message
    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    /// Create an assistant message with text only
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(AssistantMessage::text(content))
    }

    /// Create a tool result message
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::ToolResult(ToolResult::new(call_id, content))
    }

    /// Short role label used in logs and wire conversions
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::Human { .. } => "human",
            Message::Assistant(_) => "assistant",
            Message::ToolResult(_) => "tool_result",
        }
    }

    /// Text content of the message
    pub fn content(&self) -> &str {
        match self {
            Message::System { content } | Message::Human { content } => content,
            Message::Assistant(msg) => &msg.content,
            Message::ToolResult(result) => &result.content,
        }
    }

    /// Borrow the assistant payload, if this is an assistant message
    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Message::Assistant(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Model output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Text the model produced (may be empty when it only requests tools)
    #[serde(default)]
    pub content: String,

    /// Tool calls requested in this turn, in the order the model issued them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AssistantMessage {
    /// Create a text-only reply
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a reply carrying tool calls
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    /// Whether the model asked for any tool to run
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A model-issued request to run a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Opaque id, unique within its assistant turn
    pub id: String,
    /// Name of the tool to run
    pub name: String,
    /// Untyped arguments, validated by the invoker
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of one tool call, always produced even when the tool failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the originating [`ToolCallRequest`]
    pub call_id: String,
    /// Text shown to the model
    pub content: String,
}

impl ToolResult {
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Tool advertisement
// ============================================================================

/// Tool description offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Human description for the model
    pub description: String,
    /// JSON Schema object describing the arguments
    pub parameters: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serialization_is_role_tagged() {
        let msg = Message::Assistant(AssistantMessage::with_tool_calls(
            "",
            vec![ToolCallRequest::new(
                "call_1",
                "list_directory",
                json!({"directoryPath": "./data"}),
            )],
        ));

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["tool_calls"][0]["name"], "list_directory");

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_text_assistant_omits_tool_calls() {
        let value = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert!(value.get("tool_calls").is_none());
        assert!(!Message::assistant("hi").as_assistant().unwrap().has_tool_calls());
    }

    #[test]
    fn test_content_and_role() {
        let msg = Message::tool_result("call_9", "Error: boom");
        assert_eq!(msg.role(), "tool_result");
        assert_eq!(msg.content(), "Error: boom");
        assert!(msg.as_assistant().is_none());
    }
}
