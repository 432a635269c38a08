//! Logging setup: human-readable events on stderr, plus an optional JSONL file.
//!
//! The file layer is enabled when a log path or directory is known, either
//! from the environment or from the `log_dir` config key.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "CARDTRIM_LOG_PATH";
const ENV_LOG_DIR: &str = "CARDTRIM_LOG_DIR";
const LOG_FILE_NAME: &str = "cardtrim.jsonl";

/// Where, if anywhere, to write the JSONL log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file path. Wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory that receives `cardtrim.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read `CARDTRIM_LOG_PATH` / `CARDTRIM_LOG_DIR`, falling back to the
    /// configured directory when the environment has no directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self {
            log_path: non_empty_env(ENV_LOG_PATH).map(PathBuf::from),
            log_dir: non_empty_env(ENV_LOG_DIR)
                .map(PathBuf::from)
                .or(config_log_dir),
        }
    }

    /// Directory and file name of the log file, if one is configured.
    fn log_file(&self) -> Option<(PathBuf, String)> {
        if let Some(ref path) = self.log_path {
            let file_name = path.file_name()?.to_string_lossy().into_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            return Some((dir, file_name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), LOG_FILE_NAME.to_string()))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, each
/// `-v` raises the level (debug, then trace), and the configured level
/// applies when neither flag is given.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
///
/// Hold the returned guard until exit so buffered file events are flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some((dir, file_name)) = config.log_file() else {
        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .try_init()
            .context("failed to install tracing subscriber")?;
        return Ok(None);
    };

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer().json().with_ansi(false).with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(Some(guard))
}
