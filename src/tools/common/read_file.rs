//! Read tool for reading files

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use super::resolve_path;
use crate::tools::Tool;

/// Tool that returns a file's text content
#[derive(Debug, Clone, Default)]
pub struct ReadFileTool {
    base_dir: Option<PathBuf>,
}

/// Arguments for the read tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileArgs {
    /// Path of the file, absolute or relative
    pub file_path: String,
}

impl ReadFileTool {
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
impl Tool for ReadFileTool {
    type Args = ReadFileArgs;

    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file. Use this whenever the user asks to read a file, \
        look at code or analyse file contents. Accepts relative or absolute paths."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Path of the file to read"
                }
            },
            "required": ["filePath"]
        })
    }

    async fn call(&self, args: ReadFileArgs) -> Result<String> {
        let path = resolve_path(self.base_dir.as_deref(), &args.file_path);

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read file {}", args.file_path))?;

        tracing::info!(
            "[read_file] {} - read {} bytes",
            args.file_path,
            content.len()
        );

        Ok(format!("File contents:\n{}", content))
    }
}
