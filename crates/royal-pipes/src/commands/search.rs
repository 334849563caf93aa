//! Search command: prefix lookup over the word index.

use clap::Args;
use royal_pipes_core::RequestCache;
use royal_pipes_core::query::WordKind;
use tracing::{debug, instrument};

use super::style::Styled;

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive prefix; omit to list the most widespread words.
    #[arg(default_value = "")]
    pub prefix: String,

    /// Number of suggestions to show.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

/// Look up words by prefix.
#[instrument(name = "cmd_search", skip_all, fields(prefix = %args.prefix, limit = args.limit))]
pub fn cmd_search(
    args: SearchArgs,
    global_json: bool,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    debug!("executing search command");

    let suggestions = cache.search_suggestions(&args.prefix, args.limit)?;

    if global_json {
        return super::print_json(&suggestions);
    }
    if suggestions.is_empty() {
        println!("{}", format!("no words starting with {:?}", args.prefix).yellow());
        return Ok(());
    }
    for entry in &suggestions {
        let tag = match entry.kind {
            WordKind::Odds => " [odds]".cyan().to_string(),
            WordKind::Word => String::new(),
        };
        println!(
            "{}{tag}  {}",
            entry.word.bold(),
            format!(
                "{} speeches, {:.1}%",
                entry.speech_count, entry.speech_percentage
            )
            .dimmed()
        );
    }
    Ok(())
}
