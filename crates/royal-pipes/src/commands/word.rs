//! Word command: one word's yearly series and summary.

use anyhow::Context;
use clap::Args;
use royal_pipes_core::RequestCache;
use royal_pipes_core::query::{Mention, YearCount};
use royal_pipes_core::source::CountSource;
use royal_pipes_core::timeline::{self, DecadeTimeline, MonarchTimeline, WordStatistics};
use serde::Serialize;
use tracing::{debug, instrument};

use super::style::Styled;

/// How to lay out the yearly series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// One line per speech.
    #[default]
    Years,
    /// Grouped per monarch.
    Monarch,
    /// One row per decade, ten slots each.
    Decade,
}

/// Arguments for the `word` subcommand.
#[derive(Args, Debug)]
pub struct WordArgs {
    /// The word to look up (matched exactly).
    pub word: String,

    /// Read the betting-pool table instead of the full word counts.
    #[arg(long)]
    pub odds: bool,

    /// Layout of the yearly series.
    #[arg(long, value_enum, default_value_t)]
    pub layout: Layout,
}

#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum Series {
    Years(Vec<YearCount>),
    Monarch(Vec<MonarchTimeline>),
    Decade(Vec<DecadeTimeline>),
}

/// Everything shown for one word.
#[derive(Serialize)]
pub(crate) struct WordReport {
    word: String,
    source: CountSource,
    total_count: u64,
    statistics: Option<WordStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_mention: Option<Mention>,
    series: Series,
}

/// Collect the total, summary, and laid-out series for `word`.
pub(crate) fn word_report(
    cache: &RequestCache<'_>,
    word: String,
    source: CountSource,
    layout: Layout,
) -> anyhow::Result<WordReport> {
    let total_count = cache
        .word_total_count(&word, source)
        .with_context(|| format!("failed to count {word:?}"))?;
    let years = cache
        .word_counts_by_year(&word, source)
        .with_context(|| format!("failed to load the series for {word:?}"))?;
    let statistics = timeline::word_statistics(&years);
    let last_mention = match source {
        CountSource::Odds => cache.odds_word_last_mention(&word)?,
        CountSource::Word => None,
    };
    let series = match layout {
        Layout::Years => Series::Years(years),
        Layout::Monarch => Series::Monarch(timeline::timeline_by_monarch(&years)),
        Layout::Decade => Series::Decade(timeline::timeline_by_decade(&years)),
    };
    Ok(WordReport {
        word,
        source,
        total_count,
        statistics,
        last_mention,
        series,
    })
}

/// Show how often a word was said, year by year.
#[instrument(name = "cmd_word", skip_all, fields(word = %args.word, odds = args.odds))]
pub fn cmd_word(args: WordArgs, global_json: bool, cache: &RequestCache<'_>) -> anyhow::Result<()> {
    debug!(layout = ?args.layout, "executing word command");

    let source = if args.odds {
        CountSource::Odds
    } else {
        CountSource::Word
    };
    let report = word_report(cache, args.word, source, args.layout)?;

    if global_json {
        return super::print_json(&report);
    }

    println!(
        "{} {} {}",
        report.word.bold(),
        report.total_count.green(),
        format!("({} table)", report.source).dimmed()
    );
    match &report.statistics {
        Some(stats) => print_statistics(stats),
        None => println!("{}", "never mentioned".yellow()),
    }
    if let Some(last) = &report.last_mention {
        println!(
            "{}: {} ({})",
            "Last mentioned".dimmed(),
            last.year,
            last.monarch
        );
    }
    println!();
    match &report.series {
        Series::Years(years) => print_years(years),
        Series::Monarch(groups) => print_monarchs(groups),
        Series::Decade(rows) => print_decades(rows),
    }
    Ok(())
}

fn print_statistics(stats: &WordStatistics) {
    println!(
        "{}: {} ({})",
        "First mentioned".dimmed(),
        stats.first_mention.year,
        stats.first_mention.monarch
    );
    println!(
        "{}: {} ({})",
        "Last mentioned".dimmed(),
        stats.last_mention.year,
        stats.last_mention.monarch
    );
    println!(
        "{}: {} ({:.1}%)",
        "Speeches".dimmed(),
        stats.speeches_mentioning,
        stats.speech_percentage
    );
    println!(
        "{}: {} ({} times)",
        "Peak".dimmed(),
        stats.peak.year,
        stats.peak.count
    );
    println!(
        "{}: {} ({} times)",
        "Top monarch".dimmed(),
        stats.top_monarch.monarch,
        stats.top_monarch.count
    );
    println!(
        "{}: {} speeches, ending {}",
        "Longest streak".dimmed(),
        stats.longest_streak,
        stats.longest_streak_end
    );
}

fn print_years(years: &[YearCount]) {
    for entry in years {
        let count = if entry.count == 0 {
            entry.count.dimmed().to_string()
        } else {
            entry.count.to_string()
        };
        println!("{}  {:>4}  {}", entry.year, count, entry.monarch.dimmed());
    }
}

fn print_monarchs(groups: &[MonarchTimeline]) {
    for group in groups {
        println!(
            "{} {}",
            group.monarch.bold(),
            format!("{}-{}, max {}", group.first_year, group.last_year, group.max_count).dimmed()
        );
        let counts: Vec<String> = group.years.iter().map(|y| y.count.to_string()).collect();
        println!("  {}", counts.join(" "));
    }
}

fn print_decades(rows: &[DecadeTimeline]) {
    for row in rows {
        let slots: Vec<String> = row
            .slots
            .iter()
            .map(|slot| match slot {
                Some(entry) => format!("{:>3}", entry.count),
                None => format!("{:>3}", "-"),
            })
            .collect();
        println!("{}  {}", row.label.bold(), slots.join(" "));
    }
}
