//! Built-in tools
//!
//! - `ReadFileTool` - Read file contents
//! - `WriteFileTool` - Write files, creating directories
//! - `ListDirectoryTool` - List directory entries
//! - `ExecuteCommandTool` - Run shell commands with inherited I/O

use std::path::{Path, PathBuf};

use crate::core::FrameworkResult;
use crate::tools::ToolRegistry;

pub mod execute_command;
pub mod list_directory;
pub mod read_file;
pub mod write_file;

pub use execute_command::{ExecuteCommandTool, ProcessOutcome, Shell};
pub use list_directory::ListDirectoryTool;
pub use read_file::ReadFileTool;
pub use write_file::WriteFileTool;

/// Resolve a path (handle both absolute and relative)
pub(crate) fn resolve_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);
    match base_dir {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Registry with every built-in tool, relative paths resolved against `base_dir`
pub fn builtin_registry(base_dir: Option<&Path>) -> FrameworkResult<ToolRegistry> {
    let registry = match base_dir {
        Some(dir) => ToolRegistry::new()
            .with(ReadFileTool::with_base_dir(dir))?
            .with(WriteFileTool::with_base_dir(dir))?
            .with(ListDirectoryTool::with_base_dir(dir))?
            .with(ExecuteCommandTool::new().with_base_dir(dir))?,
        None => ToolRegistry::new()
            .with(ReadFileTool::new())?
            .with(WriteFileTool::new())?
            .with(ListDirectoryTool::new())?
            .with(ExecuteCommandTool::new())?,
    };
    Ok(registry)
}
