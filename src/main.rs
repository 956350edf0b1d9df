use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;

use toolcall_agent::agent::{AgentConfig, Completion, Orchestrator};
use toolcall_agent::llm::{LlmProvider, Message, OpenAiCompatibleProvider};
use toolcall_agent::logging;
use toolcall_agent::tools::builtin_registry;

const SYSTEM_PROMPT: &str = "You are a helpful assistant with access to tools for reading, \
writing and listing files and for running shell commands. Use them whenever they help \
answer the user, then reply with a concise final answer.";

#[derive(Parser, Debug)]
#[command(name = "toolcall-agent", version, about = "Run one tool-using conversation with an LLM")]
struct CliArgs {
    /// Directory that relative tool paths resolve against
    #[arg(long, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Maximum tool rounds before giving up (0 = unbounded)
    #[arg(long, value_name = "N", default_value_t = toolcall_agent::agent::DEFAULT_MAX_TOOL_ROUNDS)]
    max_rounds: usize,

    /// Per tool call timeout in seconds
    #[arg(long, value_name = "SECS")]
    tool_timeout: Option<u64>,

    /// Override the system prompt
    #[arg(long, env = "SYSTEM_PROMPT")]
    system_prompt: Option<String>,

    /// The request to send
    #[arg(required = true, trailing_var_arg = true)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    let _log_guard = logging::init_logging()?;

    let llm = OpenAiCompatibleProvider::from_env()?.with_temperature(0.0);
    tracing::info!("Using model {} via {}", llm.model(), llm.provider_name());

    let tools = Arc::new(builtin_registry(args.dir.as_deref())?);

    let mut config = AgentConfig::new()
        .with_system_prompt(args.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT))
        .with_max_tool_rounds((args.max_rounds > 0).then_some(args.max_rounds));
    if let Some(secs) = args.tool_timeout {
        config = config.with_tool_timeout(Duration::from_secs(secs));
    }

    let orchestrator = Orchestrator::new(Arc::new(llm), tools, config);
    tracing::info!(
        "Registered {} tools, max tool rounds: {:?}",
        orchestrator.tools().len(),
        orchestrator.config().max_tool_rounds
    );

    let prompt = args.prompt.join(" ");
    println!("{} {}", "You:".bright_green().bold(), prompt);

    let outcome = match orchestrator.run(prompt).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    print_tool_activity(outcome.transcript.messages());

    match outcome.completion {
        Completion::Answer(answer) => {
            println!("{}", "-".repeat(60).bright_black());
            println!("{} {}", "Assistant:".bright_blue().bold(), answer);
        }
        Completion::Exhausted { rounds } => {
            eprintln!(
                "{} gave up after {} tool rounds without a final answer",
                "Error:".red().bold(),
                rounds
            );
            return Ok(ExitCode::from(2));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_tool_activity(messages: &[Message]) {
    for message in messages {
        match message {
            Message::Assistant(reply) => {
                for call in &reply.tool_calls {
                    println!(
                        "{} {} {}",
                        "Tool:".cyan().bold(),
                        call.name.cyan(),
                        call.arguments.to_string().bright_black()
                    );
                }
            }
            Message::ToolResult(result) if result.content.starts_with(toolcall_agent::tools::ERROR_PREFIX) => {
                println!("  {}", result.content.red());
            }
            Message::ToolResult(result) => {
                println!("  {}", result.content.bright_black());
            }
            _ => {}
        }
    }
}
