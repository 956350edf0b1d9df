pub mod config;
pub mod orchestrator;

pub use config::{AgentConfig, DEFAULT_MAX_TOOL_ROUNDS};
pub use orchestrator::{Completion, Conversation, ConversationOutcome, Orchestrator};
