//! Tool Invoker
//!
//! Runs one tool call and always produces a result. Unknown tools, argument
//! validation failures, handler errors and timeouts all come back as failure
//! text; nothing raised by a tool escapes this boundary.

use std::time::Duration;

use serde_json::Value;

use super::registry::ToolRegistry;
use super::tool::{DynTool, ToolOutput};
use crate::core::FrameworkError;
use crate::llm::{ToolCallRequest, ToolResult};

/// Executes tool calls on behalf of the orchestrator
#[derive(Debug, Clone, Default)]
pub struct ToolInvoker {
    timeout: Option<Duration>,
}

impl ToolInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any invocation that has not resolved after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate `arguments` and run the tool
    pub async fn invoke(&self, tool: &dyn DynTool, arguments: Value) -> ToolOutput {
        let name = tool.name().to_string();
        let call = tool.invoke_raw(arguments);

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FrameworkError::ToolTimedOut {
                    tool: name.clone(),
                    after: limit,
                }),
            },
            None => call.await,
        };

        match outcome {
            Ok(output) => {
                tracing::debug!("[Invoker] {} succeeded ({} chars)", name, output.len());
                ToolOutput::Success(output)
            }
            Err(err) => {
                tracing::info!("[Invoker] {} failed: {}", name, err);
                ToolOutput::from(err)
            }
        }
    }

    /// Resolve a model-issued call against the registry
    pub async fn resolve(&self, registry: &ToolRegistry, call: &ToolCallRequest) -> ToolResult {
        tracing::info!(
            "[Invoker] Executing tool: {}({}) [{}]",
            call.name,
            call.arguments,
            call.id
        );

        let output = match registry.lookup(&call.name) {
            Ok(tool) => self.invoke(tool.as_ref(), call.arguments.clone()).await,
            Err(err) => {
                tracing::warn!("[Invoker] {}", err);
                ToolOutput::from(err)
            }
        };

        ToolResult::new(call.id.clone(), output.into_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::Tool;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct SleepArgs {
        millis: u64,
    }

    struct SleepTool;

    #[async_trait]
    impl Tool for SleepTool {
        type Args = SleepArgs;

        fn name(&self) -> &str {
            "sleep"
        }

        fn description(&self) -> &str {
            "Sleep, then report"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {"millis": {"type": "integer"}}})
        }

        async fn call(&self, args: SleepArgs) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(args.millis)).await;
            Ok(format!("slept {}ms", args.millis))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        type Args = Value;

        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn call(&self, _args: Value) -> Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt not found").into())
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .with(SleepTool)
            .unwrap()
            .with(FailingTool)
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failure_text() {
        let call = ToolCallRequest::new("c1", "teleport", json!({}));
        let result = ToolInvoker::new().resolve(&registry(), &call).await;

        assert_eq!(result.call_id, "c1");
        assert_eq!(result.content, "Error: unknown tool: teleport");
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_failure_text() {
        let call = ToolCallRequest::new("c2", "sleep", json!({"millis": "soon"}));
        let result = ToolInvoker::new().resolve(&registry(), &call).await;

        assert!(result.content.starts_with("Error: invalid arguments for sleep:"));
    }

    #[tokio::test]
    async fn test_handler_error_is_failure_text() {
        let call = ToolCallRequest::new("c3", "broken", json!({}));
        let result = ToolInvoker::new().resolve(&registry(), &call).await;

        assert_eq!(result.content, "Error: missing.txt not found");
    }

    #[tokio::test]
    async fn test_success_is_passed_through() {
        let call = ToolCallRequest::new("c4", "sleep", json!({"millis": 1}));
        let result = ToolInvoker::new().resolve(&registry(), &call).await;

        assert_eq!(result.content, "slept 1ms");
    }

    #[tokio::test]
    async fn test_timeout_is_failure_text() {
        let invoker = ToolInvoker::new().with_timeout(Some(Duration::from_millis(20)));
        let output = invoker.invoke(&SleepTool, json!({"millis": 5_000})).await;

        assert!(output.is_error());
        assert!(output.into_content().contains("timed out"));
    }
}
