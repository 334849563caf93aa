//! royal-pipes CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use royal_pipes::{Cli, Commands, commands};
use royal_pipes_core::RequestCache;
use royal_pipes_core::config::ConfigLoader;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    )
    .with_verbose_stderr(cli.verbose > 0);
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let json = cli.json;
    let result = match command {
        Commands::Word(args) => with_cache(&config, |cache| {
            commands::word::cmd_word(args, json, cache)
        }),
        Commands::Top(args) => with_cache(&config, |cache| commands::top::cmd_top(args, json, cache)),
        Commands::Entities(args) => with_cache(&config, |cache| {
            commands::entities::cmd_entities(args, json, cache)
        }),
        Commands::Search(args) => with_cache(&config, |cache| {
            commands::search::cmd_search(args, json, cache)
        }),
        Commands::Odds(args) => with_cache(&config, |cache| {
            commands::odds::cmd_odds(args, json, cache)
        }),
        Commands::Speeches(args) => with_cache(&config, |cache| {
            commands::speeches::cmd_speeches(args, json, cache)
        }),
        Commands::Monarchs(args) => with_cache(&config, |cache| {
            commands::monarchs::cmd_monarchs(args, json, config.top_k, cache)
        }),
        Commands::Decades(args) => with_cache(&config, |cache| {
            commands::decades::cmd_decades(args, json, config.top_k, cache)
        }),
        Commands::Signatures(args) => with_cache(&config, |cache| {
            commands::signatures::cmd_signatures(args, json, &config, cache)
        }),
        Commands::Info(args) => commands::info::cmd_info(args, json, &config, &config_sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()
                .context("failed to create async runtime for MCP server")?;
            rt.block_on(commands::serve::cmd_serve(args, config))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

/// Run one data command against a fresh request cache.
fn with_cache<F>(config: &royal_pipes_core::Config, run: F) -> anyhow::Result<()>
where
    F: FnOnce(&RequestCache<'_>) -> anyhow::Result<()>,
{
    let dataset = commands::open_dataset(config)?;
    let cache = RequestCache::new(dataset);
    let result = run(&cache);
    debug!(queries = cache.len(), hits = cache.hits(), "request finished");
    result
}
