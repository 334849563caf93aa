//! Info command implementation

use clap::Args;
use royal_pipes_core::config::{Config, ConfigSources};
use serde::Serialize;
use tracing::{debug, instrument};

use super::style::Styled;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct DatasetInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DatasetInfo {
    fn from_config(config: &Config) -> Self {
        match config.dataset_path() {
            Ok(path) => Self {
                exists: path.is_file(),
                path: Some(path.to_string()),
                error: None,
            },
            Err(e) => Self {
                path: None,
                exists: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    alpha: f64,
    prior: String,
    include_stopwords: bool,
    top_k: usize,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let prior = config.prior();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            alpha: prior.alpha,
            prior: prior.basis.as_str().to_string(),
            include_stopwords: config.include_stopwords,
            top_k: config.top_k(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    dataset: DatasetInfo,
}

/// Print package, configuration, and dataset information.
///
/// Works without a dataset; a missing one is reported, not an error.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        dataset: DatasetInfo::from_config(config),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.package.name.bold(), info.package.version.green());
    if !info.package.description.is_empty() {
        println!("{}", info.package.description);
    }
    if !info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), info.package.license);
    }
    if !info.package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), info.package.repository.cyan());
    }

    println!();
    println!("{}", "Configuration".heading());
    if let Some(ref path) = info.config.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), info.config.log_level);
    if let Some(ref dir) = info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!(
        "{}: alpha {} ({})",
        "Prior".dimmed(),
        info.config.alpha,
        info.config.prior
    );
    println!("{}: {}", "Stopwords".dimmed(), info.config.include_stopwords);
    println!("{}: {}", "Top k".dimmed(), info.config.top_k);

    println!();
    println!("{}", "Dataset".heading());
    match (&info.dataset.path, &info.dataset.error) {
        (Some(path), _) if info.dataset.exists => {
            println!("{}: {}", "Path".dimmed(), path.cyan());
        }
        (Some(path), _) => {
            println!("{}: {} {}", "Path".dimmed(), path, "(missing)".yellow());
        }
        (None, Some(err)) => println!("{}: {}", "Path".dimmed(), err.yellow()),
        (None, None) => println!("{}: {}", "Path".dimmed(), "unknown".yellow()),
    }

    Ok(())
}
