//! Scripted provider that replays canned replies
//!
//! Useful for tests and offline demos: each call to `complete` pops the next
//! queued reply and records the transcript it was given.

use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::provider::LlmProvider;
use super::types::{AssistantMessage, Message, ToolDefinition};

enum ScriptedReply {
    Message(AssistantMessage),
    Error(String),
}

/// In-memory provider replaying a queue of assistant messages
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<Vec<Message>>>,
    name: String,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::with_name("scripted")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    /// Queue the next reply
    pub fn push_reply(&self, reply: AssistantMessage) -> &Self {
        self.lock_replies().push_back(ScriptedReply::Message(reply));
        self
    }

    /// Queue a transport failure
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.lock_replies()
            .push_back(ScriptedReply::Error(message.into()));
        self
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Transcripts received, one per call
    pub fn recorded_calls(&self) -> Vec<Vec<Message>> {
        self.lock_calls().clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedReply>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Vec<Message>>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        transcript: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<AssistantMessage> {
        self.lock_calls().push(transcript.to_vec());

        match self.lock_replies().pop_front() {
            Some(ScriptedReply::Message(reply)) => Ok(reply),
            Some(ScriptedReply::Error(message)) => Err(anyhow::anyhow!(message)),
            None => anyhow::bail!("{}: no scripted replies left", self.name),
        }
    }

    fn model(&self) -> String {
        self.name.clone()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let provider = ScriptedProvider::new();
        provider
            .push_reply(AssistantMessage::text("one"))
            .push_error("401 unauthorized");

        let transcript = vec![Message::human("hi")];
        let first = provider.complete(&transcript, &[]).await.unwrap();
        assert_eq!(first.content, "one");

        let second = provider.complete(&transcript, &[]).await;
        assert!(second.unwrap_err().to_string().contains("401"));

        assert!(provider.complete(&transcript, &[]).await.is_err());
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.recorded_calls()[0], transcript);
    }
}
