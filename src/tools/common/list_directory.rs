//! Directory listing tool

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::resolve_path;
use crate::tools::Tool;

/// Tool that lists the entries of a directory
#[derive(Debug, Clone, Default)]
pub struct ListDirectoryTool {
    base_dir: Option<PathBuf>,
}

/// Arguments for the listing tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDirectoryArgs {
    pub directory_path: String,
}

impl ListDirectoryTool {
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
impl Tool for ListDirectoryTool {
    type Args = ListDirectoryArgs;

    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List all files and folders in a directory."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directoryPath": {
                    "type": "string",
                    "description": "Path of the directory to list"
                }
            },
            "required": ["directoryPath"]
        })
    }

    async fn call(&self, args: ListDirectoryArgs) -> Result<String> {
        let path = resolve_path(self.base_dir.as_deref(), &args.directory_path);

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .with_context(|| format!("failed to list directory {}", args.directory_path))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            entries.push(entry.file_name().to_string_lossy().to_string());
        }
        entries.sort();

        tracing::info!(
            "[list_directory] {} - found {} entries",
            args.directory_path,
            entries.len()
        );

        let listing = entries
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!("Directory contents:\n{}", listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_sorted_entries() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.txt"), "").unwrap();
        std::fs::write(temp.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();

        let output = ListDirectoryTool::with_base_dir(temp.path())
            .call(ListDirectoryArgs {
                directory_path: ".".into(),
            })
            .await
            .unwrap();

        assert_eq!(output, "Directory contents:\n- a.txt\n- b.txt\n- sub");
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let err = ListDirectoryTool::with_base_dir(temp.path())
            .call(ListDirectoryArgs {
                directory_path: "ghost".into(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to list directory ghost"));
    }
}
