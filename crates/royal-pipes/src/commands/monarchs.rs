//! Monarchs command: per-monarch statistics and signature words.

use clap::Args;
use royal_pipes_core::{QueryResult, RequestCache};
use royal_pipes_core::query::MonarchStats;
use royal_pipes_core::signature::SignatureWord;
use royal_pipes_core::source::ComparisonKind;
use serde::Serialize;
use tracing::{debug, instrument};

use super::style::Styled;

use super::signatures::print_signature_words;

pub(crate) const DEFAULT_TOP: usize = 12;

/// Arguments for the `monarchs` subcommand.
#[derive(Args, Debug, Default)]
pub struct MonarchsArgs {
    /// Signature words shown per monarch.
    #[arg(long)]
    pub top: Option<usize>,
}

/// A monarch with its stored signature words.
#[derive(Serialize)]
pub(crate) struct MonarchRow {
    #[serde(flatten)]
    stats: MonarchStats,
    signature_words: Vec<SignatureWord>,
}

/// Join per-monarch statistics with the first `top` stored signature words.
pub(crate) fn monarch_rows(cache: &RequestCache<'_>, top: usize) -> QueryResult<Vec<MonarchRow>> {
    let comparisons = cache.comparisons(ComparisonKind::Monarch)?;
    Ok(cache
        .monarch_stats()?
        .into_iter()
        .map(|stats| {
            let signature_words = comparisons
                .iter()
                .find(|c| c.focal_value == stats.monarch)
                .map(|c| c.signature_words.iter().take(top).cloned().collect())
                .unwrap_or_default();
            MonarchRow {
                stats,
                signature_words,
            }
        })
        .collect())
}

/// Per-monarch statistics, each with its stored signature words.
#[instrument(name = "cmd_monarchs", skip_all, fields(top))]
pub fn cmd_monarchs(
    args: MonarchsArgs,
    global_json: bool,
    config_top_k: Option<usize>,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    let top = args.top.or(config_top_k).unwrap_or(DEFAULT_TOP);
    tracing::Span::current().record("top", top);
    debug!("executing monarchs command");

    let rows = monarch_rows(cache, top)?;

    if global_json {
        return super::print_json(&rows);
    }
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            row.stats.monarch.bold(),
            format!("{}-{}", row.stats.first_year, row.stats.last_year).dimmed()
        );
        println!(
            "{}: {}, {} {:.0} words",
            "Speeches".dimmed(),
            row.stats.speech_count,
            "average".dimmed(),
            row.stats.average_words
        );
        print_signature_words(&row.signature_words);
    }
    Ok(())
}
