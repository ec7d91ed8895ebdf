use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;

use crate::i18n::Language;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKKEEP_DATA_DIR";
pub const LOG_FILE: &str = "taskkeep.log";

/// Runtime settings assembled from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub language: Language,
    pub log_level: String,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>, language: Language, log_level: impl Into<String>) -> Config {
        Config {
            data_dir: resolve_data_dir(data_dir),
            language,
            log_level: log_level.into(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// Returns the directory holding the JSON collections.
///
/// The path is determined in the following order:
/// 1. the explicit `--data-dir` value.
/// 2. `TASKKEEP_DATA_DIR` environment variable.
/// 3. `~/.local/share/taskkeep` (on Linux).
/// 4. `./taskkeep` (fallback).
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("taskkeep");
            p
        })
}

/// Creates the data directory if needed.
pub fn ensure_data_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Sends tracing output to the log file; the terminal belongs to the UI.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let log_path = config.log_path();
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
