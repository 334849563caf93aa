//! Summaries of one word's yearly series.
//!
//! All functions here take the output of
//! [`word_counts_by_year`](crate::query::word_counts_by_year), which has one
//! entry per speech in year order, and never touch the dataset.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decade::Decade;
use crate::query::{Mention, YearCount};

/// Headline numbers for a word that was mentioned at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordStatistics {
    /// Occurrences across all speeches.
    pub total_count: u64,
    /// Earliest speech mentioning the word.
    pub first_mention: Mention,
    /// Latest speech mentioning the word.
    pub last_mention: Mention,
    /// Number of speeches mentioning the word.
    pub speeches_mentioning: usize,
    /// `speeches_mentioning` as a percentage of all speeches.
    pub speech_percentage: f64,
    /// Speech with the highest count; earliest on ties.
    pub peak: YearCount,
    /// Monarch with the highest total count; first to speak on ties.
    pub top_monarch: MonarchTotal,
    /// Longest run of consecutive speeches mentioning the word.
    pub longest_streak: usize,
    /// Year of the last speech in that run.
    pub longest_streak_end: i32,
}

/// A monarch and the word's total across their speeches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonarchTotal {
    /// Monarch name.
    pub monarch: String,
    /// Occurrences across their speeches.
    pub count: u64,
}

/// A word's series for one monarch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonarchTimeline {
    /// Monarch name.
    pub monarch: String,
    /// First speech year.
    pub first_year: i32,
    /// Last speech year.
    pub last_year: i32,
    /// Highest single-speech count in the reign.
    pub max_count: u64,
    /// Every speech of the reign, oldest first.
    pub years: Vec<YearCount>,
}

/// A word's series for one decade, laid out as ten yearly slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecadeTimeline {
    /// The decade.
    pub decade: Decade,
    /// Display label, e.g. "1980s".
    pub label: String,
    /// Slot `i` is the year `decade + i`; `None` when no speech was given.
    pub slots: Vec<Option<YearCount>>,
}

/// Compute [`WordStatistics`] from a yearly series.
///
/// Returns `None` when the word is never mentioned.
pub fn word_statistics(series: &[YearCount]) -> Option<WordStatistics> {
    let mut sorted: Vec<&YearCount> = series.iter().collect();
    sorted.sort_by_key(|y| y.year);

    let mentioned: Vec<&YearCount> = sorted.iter().copied().filter(|y| y.count > 0).collect();
    let first = *mentioned.first()?;
    let last = *mentioned.last()?;

    let mut peak = first;
    for &entry in &mentioned {
        if entry.count > peak.count {
            peak = entry;
        }
    }

    let mut totals: Vec<MonarchTotal> = Vec::new();
    for entry in &sorted {
        match totals.iter_mut().find(|t| t.monarch == entry.monarch) {
            Some(total) => total.count += entry.count,
            None => totals.push(MonarchTotal {
                monarch: entry.monarch.clone(),
                count: entry.count,
            }),
        }
    }
    let mut top_monarch = totals.first()?.clone();
    for total in &totals {
        if total.count > top_monarch.count {
            top_monarch = total.clone();
        }
    }

    let (mut run, mut longest_streak, mut longest_streak_end) = (0, 0, first.year);
    for entry in &sorted {
        if entry.count > 0 {
            run += 1;
            if run > longest_streak {
                longest_streak = run;
                longest_streak_end = entry.year;
            }
        } else {
            run = 0;
        }
    }

    Some(WordStatistics {
        total_count: sorted.iter().map(|y| y.count).sum(),
        first_mention: Mention {
            year: first.year,
            monarch: first.monarch.clone(),
        },
        last_mention: Mention {
            year: last.year,
            monarch: last.monarch.clone(),
        },
        speeches_mentioning: mentioned.len(),
        speech_percentage: mentioned.len() as f64 / sorted.len() as f64 * 100.0,
        peak: peak.clone(),
        top_monarch,
        longest_streak,
        longest_streak_end,
    })
}

/// Split a series per monarch, in order of each monarch's first speech.
pub fn timeline_by_monarch(series: &[YearCount]) -> Vec<MonarchTimeline> {
    let mut groups: Vec<(String, Vec<YearCount>)> = Vec::new();
    for entry in series {
        match groups.iter_mut().find(|(m, _)| *m == entry.monarch) {
            Some((_, years)) => years.push(entry.clone()),
            None => groups.push((entry.monarch.clone(), vec![entry.clone()])),
        }
    }

    let mut timelines: Vec<MonarchTimeline> = groups
        .into_iter()
        .filter_map(|(monarch, mut years)| {
            years.sort_by_key(|y| y.year);
            Some(MonarchTimeline {
                monarch,
                first_year: years.first()?.year,
                last_year: years.last()?.year,
                max_count: years.iter().map(|y| y.count).max()?,
                years,
            })
        })
        .collect();
    timelines.sort_by_key(|t| t.first_year);
    timelines
}

/// Lay a series out as decades of ten yearly slots.
///
/// Covers every decade from the first speech to the last, including decades
/// without any speech.
pub fn timeline_by_decade(series: &[YearCount]) -> Vec<DecadeTimeline> {
    let (Some(min), Some(max)) = (
        series.iter().map(|y| y.year).min(),
        series.iter().map(|y| y.year).max(),
    ) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    let mut start = Decade::of(min).start();
    while start <= Decade::of(max).start() {
        let decade = Decade::of(start);
        let slots = (0..10)
            .map(|offset| series.iter().find(|y| y.year == start + offset).cloned())
            .collect();
        rows.push(DecadeTimeline {
            decade,
            label: decade.label(),
            slots,
        });
        start += 10;
    }
    rows
}
