//! Tool trait definition
//!
//! Tools declare a typed argument shape. The raw JSON the model produced is
//! validated by deserialising it into that shape before the handler runs, so
//! handlers only ever see well-formed arguments.

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::FrameworkError;
use crate::llm::ToolDefinition;

/// Prefix that marks failure text in a tool result
pub const ERROR_PREFIX: &str = "Error: ";

/// Outcome of running a tool
///
/// Kept as a two-armed result until it is written to the transcript, where
/// [`ToolOutput::into_content`] collapses it into text the model can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolOutput {
    /// Handler output, already carrying its own content label
    Success(String),
    /// Failure description without the error prefix
    Failure(String),
}

impl ToolOutput {
    /// Create a successful output
    pub fn success(output: impl Into<String>) -> Self {
        ToolOutput::Success(output.into())
    }

    /// Create a failed output
    pub fn failure(message: impl Into<String>) -> Self {
        ToolOutput::Failure(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Failure(_))
    }

    /// Text for the transcript; failures start with [`ERROR_PREFIX`]
    pub fn into_content(self) -> String {
        match self {
            ToolOutput::Success(output) => output,
            ToolOutput::Failure(message) => format!("{}{}", ERROR_PREFIX, message),
        }
    }
}

impl From<FrameworkError> for ToolOutput {
    fn from(err: FrameworkError) -> Self {
        ToolOutput::Failure(err.to_string())
    }
}

/// Trait for tools that the model can call
///
/// # Example
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct EchoArgs { text: String }
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl Tool for EchoTool {
///     type Args = EchoArgs;
///     fn name(&self) -> &str { "echo" }
///     fn description(&self) -> &str { "Echo text back" }
///     fn parameters(&self) -> Value {
///         json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]})
///     }
///     async fn call(&self, args: EchoArgs) -> Result<String> { Ok(args.text) }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Validated argument shape
    type Args: DeserializeOwned + Send;

    /// Unique name the model uses to call this tool
    fn name(&self) -> &str;

    /// Description for the model's consumption
    fn description(&self) -> &str;

    /// JSON Schema object advertised to the model
    fn parameters(&self) -> Value;

    /// Execute with validated arguments
    ///
    /// Returning `Err` is an ordinary tool failure; the invoker turns it into
    /// failure text and the conversation continues.
    async fn call(&self, args: Self::Args) -> Result<String>;
}

/// Object-safe form of [`Tool`] stored in the registry
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    /// Validate raw arguments and run the handler
    async fn invoke_raw(&self, arguments: Value) -> Result<String, FrameworkError>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn description(&self) -> &str {
        Tool::description(self)
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Tool::name(self).to_string(),
            description: Tool::description(self).to_string(),
            parameters: self.parameters(),
        }
    }

    async fn invoke_raw(&self, arguments: Value) -> Result<String, FrameworkError> {
        let args: T::Args =
            serde_json::from_value(arguments).map_err(|e| FrameworkError::InvalidArguments {
                tool: Tool::name(self).to_string(),
                reason: e.to_string(),
            })?;

        self.call(args)
            .await
            .map_err(|e| FrameworkError::tool_error(format!("{:#}", e)))
    }
}
