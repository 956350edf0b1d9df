//! Agent Configuration
//!
//! Configuration options for the Orchestrator.

use std::time::Duration;

/// Default cap on tool-resolution rounds per conversation
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 50;

/// Configuration for an Orchestrator
///
/// Use the builder pattern to configure the agent:
///
/// ```ignore
/// let config = AgentConfig::new()
///     .with_system_prompt("You are a code assistant that can use tools")
///     .with_max_tool_rounds(Some(20))
///     .with_tool_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// System prompt placed first in every new transcript
    pub system_prompt: Option<String>,

    /// Maximum number of tool batches per conversation; `None` means unbounded
    pub max_tool_rounds: Option<usize>,

    /// Per tool invocation limit; an expired call becomes failure text
    pub tool_timeout: Option<Duration>,

    /// Per model call limit; an expired call is a transport error
    pub model_timeout: Option<Duration>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self {
            system_prompt: None,
            max_tool_rounds: Some(DEFAULT_MAX_TOOL_ROUNDS),
            tool_timeout: None,
            model_timeout: None,
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the tool round cap (`None` for no cap)
    pub fn with_max_tool_rounds(mut self, max: Option<usize>) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Set the per tool invocation timeout
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Set the per model call timeout
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}
