//! Conversation Orchestrator
//!
//! Drives the request → execute → continue cycle:
//! - send the whole transcript to the model
//! - if the reply carries tool calls, run the batch concurrently and append
//!   one result per call in request order
//! - repeat until the model answers without tool calls
//!
//! A failing tool never aborts the loop; its failure is appended as text.
//! Model errors are not retried and surface to the caller.

use std::sync::Arc;

use futures::future::join_all;

use crate::conversation::Transcript;
use crate::core::{ConversationState, FrameworkError, FrameworkResult};
use crate::llm::{AssistantMessage, LlmProvider, ToolCallRequest, ToolResult};
use crate::tools::{ToolInvoker, ToolRegistry};

use super::config::AgentConfig;

/// How a conversation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Model answered without requesting tools
    Answer(String),
    /// Tool round cap reached while the model still wanted tools
    Exhausted { rounds: usize },
}

impl Completion {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Completion::Answer(text) => Some(text),
            Completion::Exhausted { .. } => None,
        }
    }
}

/// Result of running a conversation to completion
#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    pub completion: Completion,
    pub transcript: Transcript,
    /// Tool batches executed
    pub rounds: usize,
}

/// One conversation: its transcript and where it sits in the loop
#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Transcript,
    state: ConversationState,
    rounds: usize,
}

impl Conversation {
    /// Pick up a transcript at the state its last message implies
    pub fn from_transcript(transcript: Transcript) -> FrameworkResult<Self> {
        transcript.validate()?;

        if transcript.is_empty() {
            return Err(FrameworkError::invalid_transcript("transcript is empty"));
        }

        let pending = transcript.pending_tool_calls().len();
        let state = if transcript.final_answer().is_some() {
            ConversationState::Done
        } else if pending > 0 {
            ConversationState::executing_tools(pending)
        } else {
            ConversationState::AwaitingModel
        };

        Ok(Self {
            transcript,
            state,
            rounds: 0,
        })
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Tool batches executed so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn final_answer(&self) -> Option<&str> {
        if self.state.is_terminal() {
            self.transcript.final_answer()
        } else {
            None
        }
    }

    fn into_outcome(self, completion: Completion) -> ConversationOutcome {
        ConversationOutcome {
            completion,
            rounds: self.rounds,
            transcript: self.transcript,
        }
    }
}

/// Drives conversations between a model and a set of tools
///
/// # Example
///
/// ```ignore
/// let tools = Arc::new(builtin_registry(None)?);
/// let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatibleProvider::from_env()?);
/// let orchestrator = Orchestrator::new(llm, tools, AgentConfig::new().with_system_prompt("use tools"));
///
/// let outcome = orchestrator.run("list files in ./data").await?;
/// ```
pub struct Orchestrator {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    invoker: ToolInvoker,
    config: AgentConfig,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        let invoker = ToolInvoker::new().with_timeout(config.tool_timeout);
        Self {
            llm,
            tools,
            invoker,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Build a new conversation from the system prompt and one human message
    pub fn start(&self, human_input: impl Into<String>) -> Conversation {
        let mut transcript = Transcript::new(self.config.system_prompt.as_deref());
        transcript.push_human(human_input);

        tracing::info!(
            "[Orchestrator] Conversation started: {} at {}",
            transcript.id(),
            transcript.created_at()
        );

        Conversation {
            transcript,
            state: ConversationState::AwaitingModel,
            rounds: 0,
        }
    }

    /// Run a fresh conversation to completion
    pub async fn run(&self, human_input: impl Into<String>) -> FrameworkResult<ConversationOutcome> {
        let mut conversation = self.start(human_input);
        let completion = self.drive(&mut conversation).await?;
        Ok(conversation.into_outcome(completion))
    }

    /// Continue an existing transcript to completion
    ///
    /// A transcript that already ends in a final answer completes at once,
    /// without calling the model or any tool.
    pub async fn resume(&self, transcript: Transcript) -> FrameworkResult<ConversationOutcome> {
        let mut conversation = Conversation::from_transcript(transcript)?;
        let completion = self.drive(&mut conversation).await?;
        Ok(conversation.into_outcome(completion))
    }

    /// Step the conversation until it is done or the round cap is hit
    ///
    /// On error the conversation keeps everything appended so far.
    pub async fn drive(&self, conversation: &mut Conversation) -> FrameworkResult<Completion> {
        loop {
            if let ConversationState::ExecutingTools { .. } = conversation.state {
                if let Some(max) = self.config.max_tool_rounds {
                    if conversation.rounds >= max {
                        tracing::warn!("[Orchestrator] Max tool rounds ({}) reached", max);
                        return Ok(Completion::Exhausted {
                            rounds: conversation.rounds,
                        });
                    }
                }
            }

            if conversation.state.is_terminal() {
                let answer = conversation
                    .transcript
                    .final_answer()
                    .unwrap_or_default()
                    .to_string();
                tracing::info!(
                    "[Orchestrator] Conversation {} done after {} tool round(s)",
                    conversation.transcript.id(),
                    conversation.rounds
                );
                return Ok(Completion::Answer(answer));
            }

            self.step(conversation).await?;
        }
    }

    /// Perform exactly one state transition
    pub async fn step(&self, conversation: &mut Conversation) -> FrameworkResult<()> {
        let next = match conversation.state {
            ConversationState::AwaitingModel => {
                let reply = self.call_model(&conversation.transcript).await?;
                // A reply with repeated call ids is refused before any tool runs
                conversation.transcript.push_assistant(reply)?;
                ConversationState::ModelReplied
            }

            ConversationState::ModelReplied => {
                let pending = conversation.transcript.pending_tool_calls().len();
                if pending == 0 {
                    ConversationState::Done
                } else {
                    tracing::info!("[Orchestrator] Model requested {} tool call(s)", pending);
                    ConversationState::executing_tools(pending)
                }
            }

            ConversationState::ExecutingTools { .. } => {
                let calls = conversation.transcript.pending_tool_calls();
                let results = self.execute_batch(&calls).await;
                conversation.transcript.push_tool_results(results)?;
                conversation.rounds += 1;
                ConversationState::AwaitingModel
            }

            ConversationState::Done => ConversationState::Done,
        };

        tracing::debug!("[Orchestrator] {} -> {}", conversation.state, next);
        conversation.state = next;
        Ok(())
    }

    async fn call_model(&self, transcript: &Transcript) -> FrameworkResult<AssistantMessage> {
        let definitions = self.tools.definitions();

        tracing::info!(
            "[Orchestrator] Calling {} ({}) with {} messages",
            self.llm.provider_name(),
            self.llm.model(),
            transcript.len()
        );

        let request = self.llm.complete(transcript.messages(), &definitions);

        let reply = match self.config.model_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| FrameworkError::ModelTimedOut(limit))?,
            None => request.await,
        };

        reply.map_err(|e| {
            tracing::error!("[Orchestrator] Model request failed: {:#}", e);
            FrameworkError::Model(e)
        })
    }

    /// Run every call concurrently; results come back in request order
    async fn execute_batch(&self, calls: &[ToolCallRequest]) -> Vec<ToolResult> {
        let registry = self.tools.as_ref();
        join_all(calls.iter().map(|call| self.invoker.resolve(registry, call))).await
    }
}
