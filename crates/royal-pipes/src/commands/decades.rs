//! Decades command: per-decade statistics and signature words.

use clap::Args;
use royal_pipes_core::{QueryResult, RequestCache};
use royal_pipes_core::query::DecadeStats;
use royal_pipes_core::signature::SignatureWord;
use royal_pipes_core::source::ComparisonKind;
use serde::Serialize;
use tracing::{debug, instrument};

use super::style::Styled;

use super::signatures::print_signature_words;

pub(crate) const DEFAULT_TOP: usize = 10;

/// Arguments for the `decades` subcommand.
#[derive(Args, Debug, Default)]
pub struct DecadesArgs {
    /// Signature words shown per decade.
    #[arg(long)]
    pub top: Option<usize>,
}

/// A decade with its stored signature words.
#[derive(Serialize)]
pub(crate) struct DecadeRow {
    #[serde(flatten)]
    stats: DecadeStats,
    signature_words: Vec<SignatureWord>,
}

/// Join per-decade statistics with the first `top` stored signature words.
pub(crate) fn decade_rows(cache: &RequestCache<'_>, top: usize) -> QueryResult<Vec<DecadeRow>> {
    let comparisons = cache.comparisons(ComparisonKind::Decade)?;
    Ok(cache
        .decade_stats()?
        .into_iter()
        .map(|stats| {
            let signature_words = comparisons
                .iter()
                .find(|c| c.focal_value == stats.label)
                .map(|c| c.signature_words.iter().take(top).cloned().collect())
                .unwrap_or_default();
            DecadeRow {
                stats,
                signature_words,
            }
        })
        .collect())
}

/// Per-decade statistics, each with its stored signature words.
#[instrument(name = "cmd_decades", skip_all, fields(top))]
pub fn cmd_decades(
    args: DecadesArgs,
    global_json: bool,
    config_top_k: Option<usize>,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    let top = args.top.or(config_top_k).unwrap_or(DEFAULT_TOP);
    tracing::Span::current().record("top", top);
    debug!("executing decades command");

    let rows = decade_rows(cache, top)?;

    if global_json {
        return super::print_json(&rows);
    }
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            row.stats.label.bold(),
            row.stats.monarchs.join(", ").dimmed()
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
