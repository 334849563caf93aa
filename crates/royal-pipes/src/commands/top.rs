//! Top command: rank the most used words.

use clap::Args;
use royal_pipes_core::RequestCache;
use royal_pipes_core::query::WordStats;
use tracing::{debug, instrument};

use super::style::Styled;

/// Ranking criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RankBy {
    /// Total occurrences across all speeches.
    #[default]
    Count,
    /// Number of speeches that use the word.
    Speeches,
}

/// Arguments for the `top` subcommand.
#[derive(Args, Debug)]
pub struct TopArgs {
    /// Ranking criterion.
    #[arg(long, value_enum, default_value_t)]
    pub by: RankBy,

    /// Number of words to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,

    /// Keep stopwords in the ranking.
    #[arg(long)]
    pub stopwords: bool,
}

/// Rank the most used words.
#[instrument(name = "cmd_top", skip_all, fields(by = ?args.by, limit = args.limit))]
pub fn cmd_top(args: TopArgs, global_json: bool, cache: &RequestCache<'_>) -> anyhow::Result<()> {
    debug!(stopwords = args.stopwords, "executing top command");

    let words = match args.by {
        RankBy::Count => cache.most_used_words(args.limit, args.stopwords)?,
        RankBy::Speeches => cache.words_in_most_speeches(args.limit, args.stopwords)?,
    };

    if global_json {
        return super::print_json(&words);
    }
    if words.is_empty() {
        println!("{}", "no words".yellow());
        return Ok(());
    }
    print_table(&words, args.by);
    Ok(())
}

fn print_table(words: &[WordStats], by: RankBy) {
    let width = words.iter().map(|w| w.word.chars().count()).max().unwrap_or(0);
    for (rank, entry) in words.iter().enumerate() {
        let (primary, secondary) = match by {
            RankBy::Count => (entry.total_count, entry.speech_count),
            RankBy::Speeches => (entry.speech_count, entry.total_count),
        };
        let word = if entry.is_stopword {
            entry.word.dimmed().to_string()
        } else {
            entry.word.clone()
        };
        let pad = width.saturating_sub(entry.word.chars().count());
        println!(
            "{:>3}. {word}{}  {:>6}  {}",
            rank + 1,
            " ".repeat(pad),
            primary.green(),
            format!("({secondary})").dimmed()
        );
    }
}
