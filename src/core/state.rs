//! Conversation state types

use serde::{Deserialize, Serialize};

/// Where a conversation sits in the request/execute/continue cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    /// Transcript is ready to be sent to the model
    #[default]
    AwaitingModel,

    /// Assistant reply has been appended and not yet inspected
    ModelReplied,

    /// A batch of tool calls is running
    ExecutingTools {
        /// Number of calls in the batch
        pending: usize,
    },

    /// Model produced a reply with no tool calls
    Done,
}

impl ConversationState {
    /// Check if the conversation has reached its terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationState::Done)
    }

    /// Create an executing tools state
    pub fn executing_tools(pending: usize) -> Self {
        ConversationState::ExecutingTools { pending }
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationState::AwaitingModel => write!(f, "awaiting model"),
            ConversationState::ModelReplied => write!(f, "model replied"),
            ConversationState::ExecutingTools { pending } => {
                write!(f, "executing {} tool call(s)", pending)
            }
            ConversationState::Done => write!(f, "done"),
        }
    }
}
