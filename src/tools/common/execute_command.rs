//! Command tool for running shell commands
//!
//! The command line is handed to the platform shell so pipes and quoting work.
//! Its standard streams are inherited from this process, so output shows up
//! live for whoever supervises the run instead of being captured.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::resolve_path;
use crate::tools::Tool;

/// Shell used to interpret command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    args: Vec<String>,
}

impl Shell {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `sh -c` on Unix, `cmd /C` on Windows
    pub fn system() -> Self {
        if cfg!(windows) {
            Self::new("cmd", &["/C"])
        } else {
            Self::new("sh", &["-c"])
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::system()
    }
}

/// How a spawned command ended
///
/// Every run ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Process ran and terminated; `code` is `None` when killed by a signal
    Exited { code: Option<i32> },
    /// Process could not be started (or could not be waited on)
    SpawnError(String),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Exited { code: Some(0) })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessOutcome::Exited { code } => *code,
            ProcessOutcome::SpawnError(_) => None,
        }
    }
}

/// Tool that runs a command through the shell and reports how it ended
pub struct ExecuteCommandTool {
    shell: Shell,
    base_dir: Option<PathBuf>,
}

/// Arguments for the command tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandArgs {
    /// Command line, interpreted by the shell
    pub command: String,
    /// Directory to run in; defaults to the current directory
    #[serde(default)]
    pub working_directory: Option<String>,
}

impl ExecuteCommandTool {
    /// Run commands with the system shell in the current directory
    pub fn new() -> Self {
        Self {
            shell: Shell::system(),
            base_dir: None,
        }
    }

    /// Resolve relative working directories against `base_dir`
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Use a different shell
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// Spawn the command and wait for it to end
    pub async fn run(&self, command: &str, working_dir: Option<&Path>) -> ProcessOutcome {
        let mut cmd = Command::new(&self.shell.program);
        cmd.args(&self.shell.args)
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = working_dir.or(self.base_dir.as_deref()) {
            cmd.current_dir(dir);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(
                    "[execute_command] Failed to spawn '{}' via {}: {}",
                    command,
                    self.shell.program(),
                    e
                );
                return ProcessOutcome::SpawnError(e.to_string());
            }
        };

        match child.wait().await {
            Ok(status) => ProcessOutcome::Exited {
                code: status.code(),
            },
            Err(e) => ProcessOutcome::SpawnError(format!("failed to wait for process: {}", e)),
        }
    }
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Guidance appended after a successful run in an explicit directory
fn directory_hint(dir: &str) -> String {
    format!(
        "\n\nImportant: the command succeeded in directory \"{dir}\". \
        To keep running commands in this project directory, pass \
        workingDirectory: \"{dir}\" again instead of using cd."
    )
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    type Args = ExecuteCommandArgs;

    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a system command, optionally in a given working directory. \
        Output is shown live to the user; the result only reports success or the exit code."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command to execute"
                },
                "workingDirectory": {
                    "type": "string",
                    "description": "Working directory for the command (recommended)"
                }
            },
            "required": ["command"]
        })
    }

    async fn call(&self, args: ExecuteCommandArgs) -> Result<String> {
        let dir = args
            .working_directory
            .as_deref()
            .map(|d| resolve_path(self.base_dir.as_deref(), d));

        match &args.working_directory {
            Some(d) => tracing::info!("[execute_command] {} (working directory: {})", args.command, d),
            None => tracing::info!("[execute_command] {}", args.command),
        }

        let outcome = self.run(&args.command, dir.as_deref()).await;

        match outcome {
            ProcessOutcome::Exited { code: Some(0) } => {
                tracing::info!("[execute_command] '{}' succeeded", args.command);
                let hint = args
                    .working_directory
                    .as_deref()
                    .map(directory_hint)
                    .unwrap_or_default();
                Ok(format!("Command succeeded: {}{}", args.command, hint))
            }
            ProcessOutcome::Exited { code: Some(code) } => {
                tracing::info!("[execute_command] '{}' failed with exit code {}", args.command, code);
                anyhow::bail!("command failed with exit code {}", code)
            }
            ProcessOutcome::Exited { code: None } => {
                tracing::info!("[execute_command] '{}' terminated by signal", args.command);
                anyhow::bail!("command terminated by a signal before exiting")
            }
            ProcessOutcome::SpawnError(message) => {
                anyhow::bail!("command failed to start: {}", message)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::tools::{ToolInvoker, ToolOutput};
    use tempfile::TempDir;

    fn args(command: &str, working_directory: Option<&str>) -> ExecuteCommandArgs {
        ExecuteCommandArgs {
            command: command.to_string(),
            working_directory: working_directory.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_exit_zero_is_success() {
        let output = ExecuteCommandTool::new().call(args("true", None)).await.unwrap();
        assert_eq!(output, "Command succeeded: true");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_code() {
        let err = ExecuteCommandTool::new()
            .call(args("exit 7", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains('7'));
    }

    #[tokio::test]
    async fn test_pipes_are_interpreted_by_shell() {
        let outcome = ExecuteCommandTool::new()
            .run("echo hi | grep -q hi", None)
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let tool = ExecuteCommandTool::new()
            .with_shell(Shell::new("definitely-not-a-real-shell-binary", &["-c"]));

        let outcome = tool.run("true", None).await;
        assert!(matches!(outcome, ProcessOutcome::SpawnError(_)));
        assert_eq!(outcome.exit_code(), None);

        let output = ToolInvoker::new()
            .invoke(&tool, serde_json::json!({"command": "true"}))
            .await;
        let content = output.into_content();
        assert!(content.starts_with("Error: command failed to start: "));
        assert_eq!(content.matches("Error:").count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_command_reports_shell_exit_code() {
        let output = ToolInvoker::new()
            .invoke(
                &ExecuteCommandTool::new(),
                serde_json::json!({"command": "definitely_not_a_cmd_xyz"}),
            )
            .await;

        assert!(output.is_error());
        let content = output.into_content();
        assert!(content.starts_with("Error: "));
        assert!(content.contains("127"));
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let outcome = ExecuteCommandTool::new().run("true", Some(&missing)).await;
        assert!(matches!(outcome, ProcessOutcome::SpawnError(_)));
    }

    #[tokio::test]
    async fn test_working_directory_is_used_and_hinted() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();

        let output = ExecuteCommandTool::new()
            .call(args("touch marker.txt", Some(&dir)))
            .await
            .unwrap();

        assert!(temp.path().join("marker.txt").exists());
        assert!(output.starts_with("Command succeeded: touch marker.txt"));
        assert!(output.contains(&format!("workingDirectory: \"{}\"", dir)));
    }

    #[tokio::test]
    async fn test_invoker_reports_exit_code() {
        let output = ToolInvoker::new()
            .invoke(
                &ExecuteCommandTool::new(),
                serde_json::json!({"command": "exit 7"}),
            )
            .await;
        assert_eq!(
            output,
            ToolOutput::Failure("command failed with exit code 7".to_string())
        );
    }
}
