//! Framework error types

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the agent framework
///
/// Only configuration and transport errors ever reach the caller of a
/// conversation. Dispatch, validation and execution errors are rendered into
/// tool-result text by the invoker so the model can see and react to them.
#[derive(Error, Debug)]
pub enum FrameworkError {
    /// Two tools registered under the same name
    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    /// The model requested a tool that is not registered
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the tool's argument shape
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Tool handler failed
    #[error("{0}")]
    ToolFailed(String),

    /// Tool did not resolve within the configured timeout
    #[error("tool {tool} timed out after {after:?}")]
    ToolTimedOut { tool: String, after: Duration },

    /// Model client failed (transport, authentication, malformed reply)
    #[error("Model request failed: {0:#}")]
    Model(#[source] anyhow::Error),

    /// Model client did not reply within the configured timeout
    #[error("Model request timed out after {0:?}")]
    ModelTimedOut(Duration),

    /// Transcript violates its structural invariants
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FrameworkError {
    /// Create a tool error
    pub fn tool_error(msg: impl Into<String>) -> Self {
        FrameworkError::ToolFailed(msg.into())
    }

    /// Create an invalid transcript error
    pub fn invalid_transcript(msg: impl Into<String>) -> Self {
        FrameworkError::InvalidTranscript(msg.into())
    }
}

/// Result type alias for framework operations
pub type FrameworkResult<T> = Result<T, FrameworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FrameworkError::DuplicateToolName("read_file".into());
        assert_eq!(err.to_string(), "Duplicate tool name: read_file");

        let err = FrameworkError::UnknownTool("fly".into());
        assert_eq!(err.to_string(), "unknown tool: fly");

        let err = FrameworkError::InvalidArguments {
            tool: "read_file".into(),
            reason: "missing field `filePath`".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid arguments for read_file: missing field `filePath`"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let framework_err: FrameworkError = io_err.into();
        assert!(matches!(framework_err, FrameworkError::Io(_)));
    }
}
