//! Logging and tracing setup.
//!
//! Two sinks share one [`EnvFilter`]:
//! - stderr, human-readable, warnings and above unless `-v` or `RUST_LOG`
//!   asks for more;
//! - a daily-rotated JSONL file via `tracing-appender`.
//!
//! The log file location resolves as `ROYAL_PIPES_LOG_PATH` (exact file) >
//! `ROYAL_PIPES_LOG_DIR` > config `log_dir` > `<user data dir>/logs`. When the
//! directory cannot be created the file sink is skipped.

use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_PATH_ENV: &str = "ROYAL_PIPES_LOG_PATH";
const LOG_DIR_ENV: &str = "ROYAL_PIPES_LOG_DIR";
const LOG_FILE_PREFIX: &str = "royal-pipes.jsonl";

/// Where log output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file path; wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for rotated JSONL files.
    pub log_dir: Option<PathBuf>,
    /// Show everything the filter allows on stderr, not just warnings.
    pub verbose_stderr: bool,
}

impl ObservabilityConfig {
    /// Resolve from the environment, falling back to the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            non_empty_env(LOG_PATH_ENV),
            non_empty_env(LOG_DIR_ENV),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<String>,
        env_dir: Option<String>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let log_dir = env_dir
            .map(PathBuf::from)
            .or(config_log_dir)
            .or_else(|| {
                royal_pipes_core::config::user_data_dir()
                    .map(|dir| dir.join("logs").into_std_path_buf())
            });
        Self {
            log_path: env_path.map(PathBuf::from),
            log_dir,
            verbose_stderr: false,
        }
    }

    /// Let stderr show everything the filter allows.
    #[must_use]
    pub const fn with_verbose_stderr(mut self, verbose: bool) -> Self {
        self.verbose_stderr = verbose;
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Build the filter: `RUST_LOG` > `-q` / `-v` > configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_for(quiet, verbose, default_level))
}

fn level_for(quiet: bool, verbose: u8, default_level: &str) -> &str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes the file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_level = if config.verbose_stderr {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(stderr_level);

    let (file_layer, guard) = match file_writer(config) {
        Some((writer, guard)) => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

fn file_writer(
    config: &ObservabilityConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let appender = if let Some(path) = &config.log_path {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
        let file = path.file_name()?;
        ensure_dir(dir)?;
        tracing_appender::rolling::never(dir, file)
    } else {
        let dir = config.log_dir.as_deref()?;
        ensure_dir(dir)?;
        tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)
    };
    Some(tracing_appender::non_blocking(appender))
}

fn ensure_dir(dir: &Path) -> Option<()> {
    std::fs::create_dir_all(dir).ok()
}
