//! Library interface for the `royal-pipes` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                    Log filter (e.g., debug, royal_pipes_core=trace)
    XDG_DATA_HOME               Data home; the dataset is $XDG_DATA_HOME/royal-pipes/analytics.db
    ROYAL_PIPES_DATABASE        Explicit dataset path
    ROYAL_PIPES_ALPHA           Prior concentration for on-demand scoring
    ROYAL_PIPES_PRIOR           Prior basis (background, pooled)
    ROYAL_PIPES_LOG_PATH        Explicit log file path
    ROYAL_PIPES_LOG_DIR         Log directory
";
/// Command-line interface definition for royal-pipes.
#[derive(Parser)]
#[command(name = "royal-pipes")]
#[command(
    about = "Word statistics and signature words from New Year's Eve monarch speeches",
    long_about = None
)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Show how often a word was said, year by year
    Word(commands::word::WordArgs),

    /// Rank the most used words
    Top(commands::top::TopArgs),

    /// Rank the most mentioned people or places
    Entities(commands::entities::EntitiesArgs),

    /// Look up words by prefix
    Search(commands::search::SearchArgs),

    /// Show the betting-pool words and their recent track record
    Odds(commands::odds::OddsArgs),

    /// List every speech with its length
    Speeches(commands::speeches::SpeechesArgs),

    /// Per-monarch statistics and signature words
    Monarchs(commands::monarchs::MonarchsArgs),

    /// Per-decade statistics and signature words
    Decades(commands::decades::DecadesArgs),

    /// Score signature words for one decade or monarch against all others
    Signatures(commands::signatures::SignaturesArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
