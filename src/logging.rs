//! Logging setup
//!
//! Console output goes to stderr so stdout stays free for answers.
//!
//! Environment:
//! - `RUST_LOG` - filter directives (default `toolcall_agent=info`)
//! - `LOG_FORMAT=json` - structured JSON lines instead of human output
//! - `LOG_DIR` - also write a daily rolling log file into this directory

use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "toolcall_agent=info";
const LOG_FILE_PREFIX: &str = "toolcall-agent.log";

/// Logging options, normally read from the environment
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub json: bool,
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            log_dir: env::var_os("LOG_DIR").map(PathBuf::from),
        }
    }
}

/// Install the global subscriber using [`LoggingConfig::from_env`]
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_logging() -> anyhow::Result<Option<WorkerGuard>> {
    init_logging_with(LoggingConfig::from_env())
}

/// Install the global subscriber with explicit options
pub fn init_logging_with(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_target(false).with_writer(std::io::stderr).boxed()
    };

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    tracing::debug!("Logging initialized: {:?}", config);
    Ok(guard)
}
