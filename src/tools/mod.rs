//! Tool system for the agent framework
//!
//! This module provides:
//! - `Tool` trait - Interface for implementing tools with typed arguments
//! - `ToolOutput` - Success or failure of one execution
//! - `ToolRegistry` - Registry for managing available tools
//! - `ToolInvoker` - Validates, executes and converts failures to text
//! - `common` - Built-in tools (read_file, write_file, list_directory, execute_command)

mod invoker;
mod registry;
mod tool;

/// Common/built-in tools
pub mod common;

// Core exports
pub use invoker::ToolInvoker;
pub use registry::ToolRegistry;
pub use tool::{DynTool, Tool, ToolOutput, ERROR_PREFIX};

// Re-export common tools for convenience
pub use common::{
    builtin_registry, ExecuteCommandTool, ListDirectoryTool, ProcessOutcome, ReadFileTool, Shell,
    WriteFileTool,
};
