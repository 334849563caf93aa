//! Odds command: betting-pool words and their recent record.

use clap::Args;
use royal_pipes_core::RequestCache;
use royal_pipes_core::query::RECENT_SPEECHES;
use tracing::{debug, instrument};

use super::style::Styled;

/// Arguments for the `odds` subcommand.
#[derive(Args, Debug, Default)]
pub struct OddsArgs {
    // No subcommand-specific arguments; uses global --json flag
}

/// Show the betting-pool words, favourites first.
#[instrument(name = "cmd_odds", skip_all)]
pub fn cmd_odds(_args: OddsArgs, global_json: bool, cache: &RequestCache<'_>) -> anyhow::Result<()> {
    debug!("executing odds command");

    let words = cache.all_odds_words()?;

    if global_json {
        return super::print_json(&words);
    }
    if words.is_empty() {
        println!("{}", "no odds words".yellow());
        return Ok(());
    }
    println!(
        "{}",
        format!("odds, last {RECENT_SPEECHES} speeches (newest first), last mention").dimmed()
    );
    for entry in &words {
        let recent: String = entry
            .recent
            .iter()
            .map(|r| {
                if r.mentioned {
                    "●".green().to_string()
                } else {
                    "○".dimmed().to_string()
                }
            })
            .collect();
        let last = entry.last_mentioned.as_ref().map_or_else(
            || "never".yellow().to_string(),
            |m| format!("{} ({})", m.year, m.monarch),
        );
        println!(
            "{:>7.2}  {}  {recent}  {last}",
            entry.odds,
            entry.word.bold()
        );
    }
    Ok(())
}
