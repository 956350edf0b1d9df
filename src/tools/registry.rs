//! Tool registry for managing available tools
//!
//! The registry binds tool names to tools. It is filled once during setup and
//! then shared read-only (usually behind an `Arc`) by every conversation.
//! Argument validation is not its concern; that happens in the invoker.

use std::collections::HashMap;
use std::sync::Arc;

use super::tool::{DynTool, Tool};
use crate::core::{FrameworkError, FrameworkResult};
use crate::llm::ToolDefinition;

/// Registry that holds all available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn DynTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Fails with [`FrameworkError::DuplicateToolName`] if the name is taken.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> FrameworkResult<()> {
        self.register_dyn(Arc::new(tool))
    }

    /// Register an already type-erased tool
    pub fn register_dyn(&mut self, tool: Arc<dyn DynTool>) -> FrameworkResult<()> {
        let name = tool.name().to_string();

        if self.contains(&name) {
            tracing::error!("[ToolRegistry] Tool name conflict: '{}'", name);
            return Err(FrameworkError::DuplicateToolName(name));
        }

        tracing::info!("[ToolRegistry] Registering tool: {}", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder-style registration
    pub fn with<T: Tool + 'static>(mut self, tool: T) -> FrameworkResult<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by name
    pub fn lookup(&self, name: &str) -> FrameworkResult<Arc<dyn DynTool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| FrameworkError::UnknownTool(name.to_string()))
    }

    /// Tool definitions for the model, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Get the sorted list of tool names
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::common::{ListDirectoryTool, ReadFileTool};

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(matches!(
            registry.lookup("nonexistent"),
            Err(FrameworkError::UnknownTool(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new()
            .with(ReadFileTool::new())
            .unwrap()
            .with(ListDirectoryTool::new())
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tool_names(), vec!["list_directory", "read_file"]);
        assert_eq!(registry.lookup("read_file").unwrap().name(), "read_file");

        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["list_directory", "read_file"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(ReadFileTool::new()).unwrap();

        let err = registry.register(ReadFileTool::new()).unwrap_err();
        assert!(matches!(err, FrameworkError::DuplicateToolName(ref n) if n == "read_file"));
        assert_eq!(registry.len(), 1);
    }
}
