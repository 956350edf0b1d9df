use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::core::{FrameworkError, FrameworkResult};
use crate::llm::{AssistantMessage, Message, ToolCallRequest, ToolResult};

/// Ordered, append-only message history of one conversation
///
/// Invariants:
/// - a system message appears at most once, and only as the first message
/// - every tool result answers a call of the closest preceding assistant
///   message, at most once
///
/// Appending through [`Transcript::push_tool_results`] additionally keeps
/// results in the order the calls were issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    id: String,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript, optionally starting with a system message
    pub fn new(system_prompt: Option<&str>) -> Self {
        let id = Uuid::new_v4().to_string();
        tracing::debug!("Creating new transcript with ID: {}", id);

        let messages = system_prompt
            .map(|prompt| vec![Message::system(prompt)])
            .unwrap_or_default();

        Self {
            id,
            created_at: Utc::now(),
            messages,
        }
    }

    /// Rebuild a transcript from existing messages, checking its invariants
    pub fn from_messages(messages: Vec<Message>) -> FrameworkResult<Self> {
        let transcript = Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            messages,
        };
        transcript.validate()?;
        Ok(transcript)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append user input
    pub fn push_human(&mut self, content: impl Into<String>) {
        self.messages.push(Message::human(content));
    }

    /// Append a model reply
    ///
    /// Rejects a reply that reuses a tool call id, since its results could
    /// not be told apart.
    pub fn push_assistant(&mut self, message: AssistantMessage) -> FrameworkResult<()> {
        check_unique_call_ids(&message)?;
        self.messages.push(Message::Assistant(message));
        Ok(())
    }

    /// Append the results of the pending tool-call batch
    ///
    /// `results` must answer every pending call, in request order.
    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) -> FrameworkResult<()> {
        let pending = self.pending_tool_calls();

        if pending.len() != results.len() {
            return Err(FrameworkError::invalid_transcript(format!(
                "expected {} tool result(s), got {}",
                pending.len(),
                results.len()
            )));
        }

        if let Some((call, result)) = pending
            .iter()
            .zip(&results)
            .find(|(call, result)| call.id != result.call_id)
        {
            return Err(FrameworkError::invalid_transcript(format!(
                "tool result for '{}' appended where '{}' was expected",
                result.call_id, call.id
            )));
        }

        self.messages
            .extend(results.into_iter().map(Message::ToolResult));
        Ok(())
    }

    /// Tool calls of the trailing assistant message that have no result yet
    pub fn pending_tool_calls(&self) -> Vec<ToolCallRequest> {
        let Some(assistant_idx) = self
            .messages
            .iter()
            .rposition(|m| !matches!(m, Message::ToolResult(_)))
        else {
            return Vec::new();
        };

        let Some(assistant) = self.messages[assistant_idx].as_assistant() else {
            return Vec::new();
        };

        let answered: HashSet<&str> = self.messages[assistant_idx + 1..]
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult(result) => Some(result.call_id.as_str()),
                _ => None,
            })
            .collect();

        assistant
            .tool_calls
            .iter()
            .filter(|call| !answered.contains(call.id.as_str()))
            .cloned()
            .collect()
    }

    /// Final answer, if the transcript ends with an assistant reply without tool calls
    pub fn final_answer(&self) -> Option<&str> {
        match self.last() {
            Some(Message::Assistant(reply)) if !reply.has_tool_calls() => Some(&reply.content),
            _ => None,
        }
    }

    /// Check the structural invariants
    pub fn validate(&self) -> FrameworkResult<()> {
        let mut open_calls: Vec<&str> = Vec::new();
        let mut answered: HashSet<&str> = HashSet::new();

        for (idx, message) in self.messages.iter().enumerate() {
            match message {
                Message::System { .. } if idx != 0 => {
                    return Err(FrameworkError::invalid_transcript(format!(
                        "system message at position {}; it may only be first",
                        idx
                    )));
                }
                Message::System { .. } | Message::Human { .. } => {
                    open_calls.clear();
                    answered.clear();
                }
                Message::Assistant(reply) => {
                    check_unique_call_ids(reply)?;
                    open_calls = reply.tool_calls.iter().map(|c| c.id.as_str()).collect();
                    answered.clear();
                }
                Message::ToolResult(result) => {
                    let call_id = result.call_id.as_str();
                    if !open_calls.contains(&call_id) {
                        return Err(FrameworkError::invalid_transcript(format!(
                            "tool result '{}' does not answer a call of the preceding assistant message",
                            call_id
                        )));
                    }
                    if !answered.insert(call_id) {
                        return Err(FrameworkError::invalid_transcript(format!(
                            "tool call '{}' answered twice",
                            call_id
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn check_unique_call_ids(reply: &AssistantMessage) -> FrameworkResult<()> {
    let mut ids = HashSet::new();
    match reply.tool_calls.iter().find(|c| !ids.insert(c.id.as_str())) {
        Some(dup) => Err(FrameworkError::invalid_transcript(format!(
            "tool call id '{}' used twice in one assistant message",
            dup.id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, "read_file", json!({"filePath": id}))
    }

    #[test]
    fn test_new_with_system_prompt() {
        let mut transcript = Transcript::new(Some("use tools"));
        transcript.push_human("hi");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0], Message::system("use tools"));
        assert!(transcript.validate().is_ok());
        assert!(transcript.pending_tool_calls().is_empty());
        assert!(transcript.final_answer().is_none());
    }

    #[test]
    fn test_pending_calls_and_results_in_order() {
        let mut transcript = Transcript::new(None);
        transcript.push_human("read a and b");
        transcript
            .push_assistant(AssistantMessage::with_tool_calls("", vec![call("a"), call("b")]))
            .unwrap();

        let pending: Vec<_> = transcript.pending_tool_calls().into_iter().map(|c| c.id).collect();
        assert_eq!(pending, vec!["a", "b"]);

        let err = transcript
            .push_tool_results(vec![ToolResult::new("b", "x"), ToolResult::new("a", "y")])
            .unwrap_err();
        assert!(matches!(err, FrameworkError::InvalidTranscript(_)));
        assert_eq!(transcript.len(), 2);

        transcript
            .push_tool_results(vec![ToolResult::new("a", "y"), ToolResult::new("b", "x")])
            .unwrap();
        assert!(transcript.pending_tool_calls().is_empty());
        assert!(transcript.validate().is_ok());
    }

    #[test]
    fn test_result_count_must_match() {
        let mut transcript = Transcript::new(None);
        transcript.push_human("go");
        transcript
            .push_assistant(AssistantMessage::with_tool_calls("", vec![call("a")]))
            .unwrap();

        assert!(transcript.push_tool_results(Vec::new()).is_err());
    }

    #[test]
    fn test_push_assistant_rejects_repeated_call_id() {
        let mut transcript = Transcript::new(None);
        transcript.push_human("go");

        let err = transcript
            .push_assistant(AssistantMessage::with_tool_calls("", vec![call(""), call("")]))
            .unwrap_err();

        assert!(matches!(err, FrameworkError::InvalidTranscript(_)));
        assert!(err.to_string().contains("used twice"));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_final_answer() {
        let mut transcript = Transcript::new(None);
        transcript.push_human("hi");
        transcript.push_assistant(AssistantMessage::text("hello")).unwrap();
        assert_eq!(transcript.final_answer(), Some("hello"));
    }

    #[test]
    fn test_from_messages_rejects_late_system() {
        let err = Transcript::from_messages(vec![
            Message::human("hi"),
            Message::system("late"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("system message at position 1"));
    }

    #[test]
    fn test_from_messages_rejects_orphan_result() {
        let err = Transcript::from_messages(vec![
            Message::human("hi"),
            Message::tool_result("ghost", "boo"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_from_messages_rejects_double_answer() {
        let err = Transcript::from_messages(vec![
            Message::human("hi"),
            Message::Assistant(AssistantMessage::with_tool_calls("", vec![call("a")])),
            Message::tool_result("a", "1"),
            Message::tool_result("a", "2"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("answered twice"));
    }

    #[test]
    fn test_partially_answered_batch_is_pending() {
        let transcript = Transcript::from_messages(vec![
            Message::human("hi"),
            Message::Assistant(AssistantMessage::with_tool_calls("", vec![call("a"), call("b")])),
            Message::tool_result("a", "1"),
        ])
        .unwrap();

        let pending: Vec<_> = transcript.pending_tool_calls().into_iter().map(|c| c.id).collect();
        assert_eq!(pending, vec!["b"]);
    }

    #[test]
    fn test_serde_roundtrip_keeps_messages() {
        let mut transcript = Transcript::new(Some("sys"));
        transcript.push_human("hi");

        let json = serde_json::to_string(&transcript).unwrap();
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), transcript.id());
        assert_eq!(back.messages(), transcript.messages());
    }
}
