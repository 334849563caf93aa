//! Speeches command: every speech with its length.

use clap::Args;
use royal_pipes_core::{QueryResult, RequestCache};
use royal_pipes_core::query::Speech;
use serde::Serialize;
use tracing::{debug, instrument};

use super::style::Styled;

/// Arguments for the `speeches` subcommand.
#[derive(Args, Debug, Default)]
pub struct SpeechesArgs {
    // No subcommand-specific arguments; uses global --json flag
}

/// Speech count plus every speech.
#[derive(Serialize)]
pub(crate) struct SpeechesReport {
    total_speeches: u64,
    speeches: Vec<Speech>,
}

/// Collect the speech list.
pub(crate) fn speeches_report(cache: &RequestCache<'_>) -> QueryResult<SpeechesReport> {
    Ok(SpeechesReport {
        total_speeches: cache.total_speeches()?,
        speeches: cache.all_speeches()?,
    })
}

/// List every speech in year order.
#[instrument(name = "cmd_speeches", skip_all)]
pub fn cmd_speeches(
    _args: SpeechesArgs,
    global_json: bool,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    debug!("executing speeches command");

    let report = speeches_report(cache)?;

    if global_json {
        return super::print_json(&report);
    }
    println!("{} {}", report.total_speeches.bold(), "speeches".dimmed());
    for speech in &report.speeches {
        println!(
            "{}  {:>6}  {}",
            speech.year,
            speech.word_count,
            speech.monarch.dimmed()
        );
    }
    Ok(())
}
