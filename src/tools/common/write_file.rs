//! Write tool for creating/writing files
//!
//! Missing parent directories are created.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::resolve_path;
use crate::tools::Tool;

/// Tool that writes text to a file
#[derive(Debug, Clone, Default)]
pub struct WriteFileTool {
    base_dir: Option<PathBuf>,
}

/// Arguments for the write tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileArgs {
    pub file_path: String,
    pub content: String,
}

impl WriteFileTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    type Args = WriteFileArgs;

    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file, creating parent directories as needed. \
        Overwrites the file if it already exists."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Path of the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                }
            },
            "required": ["filePath", "content"]
        })
    }

    async fn call(&self, args: WriteFileArgs) -> Result<String> {
        let path = resolve_path(self.base_dir.as_deref(), &args.file_path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        tokio::fs::write(&path, &args.content)
            .await
            .with_context(|| format!("failed to write file {}", args.file_path))?;

        tracing::info!(
            "[write_file] {} - wrote {} bytes",
            args.file_path,
            args.content.len()
        );

        Ok(format!("File written: {}", args.file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let tool = WriteFileTool::with_base_dir(temp.path());

        let output = tool
            .call(WriteFileArgs {
                file_path: "nested/deeper/out.txt".into(),
                content: "data".into(),
            })
            .await
            .unwrap();

        assert_eq!(output, "File written: nested/deeper/out.txt");
        let written = std::fs::read_to_string(temp.path().join("nested/deeper/out.txt")).unwrap();
        assert_eq!(written, "data");
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        std::fs::write(&file, "old").unwrap();

        WriteFileTool::new()
            .call(WriteFileArgs {
                file_path: file.to_string_lossy().to_string(),
                content: "new".into(),
            })
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }
}
