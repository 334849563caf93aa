//! Word and entity counts: totals, yearly series, rankings, search.

use std::collections::HashSet;

use rusqlite::{OptionalExtension, params};

use crate::dataset::{Dataset, count};
use crate::error::QueryResult;
use crate::source::{CountSource, EntitySource};

use super::corpus::total_speeches;
use super::reports::{EntityStats, SearchEntry, WordKind, WordStats, YearCount};

/// Sum of `count` across all years for `word`; 0 if it never occurs.
#[tracing::instrument(skip(dataset))]
pub fn word_total_count(dataset: &Dataset, word: &str, source: CountSource) -> QueryResult<u64> {
    let sql = format!("SELECT SUM(count) FROM {} WHERE word = ?1", source.table());
    let total: Option<i64> = dataset.with_conn(|conn| {
        conn.prepare_cached(&sql)?
            .query_row([word], |row| row.get(0))
            .optional()
            .map(Option::flatten)
    })?;
    Ok(total.map_or(0, count))
}

/// One entry per speech year, ascending, with `word`'s count that year.
///
/// Speech years are the axis: years without a row for `word` report 0.
#[tracing::instrument(skip(dataset))]
pub fn word_counts_by_year(
    dataset: &Dataset,
    word: &str,
    source: CountSource,
) -> QueryResult<Vec<YearCount>> {
    let sql = format!(
        "SELECT s.year, s.monarch, COALESCE(c.count, 0)
         FROM speech s
         LEFT JOIN {} c ON c.year = s.year AND c.word = ?1
         ORDER BY s.year",
        source.table()
    );
    let series = dataset.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([word], |row| {
            Ok(YearCount {
                year: row.get(0)?,
                monarch: row.get(1)?,
                count: count(row.get(2)?),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    tracing::debug!(years = series.len(), "yearly series loaded");
    Ok(series)
}

/// How to order a word ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RankBy {
    TotalCount,
    SpeechCount,
}

fn ranked_words(
    dataset: &Dataset,
    limit: usize,
    include_stopwords: bool,
    by: RankBy,
) -> QueryResult<Vec<WordStats>> {
    let filter = if include_stopwords {
        ""
    } else {
        "AND is_stopword = 0"
    };
    let order = match by {
        RankBy::TotalCount => "total DESC, speeches DESC, word ASC",
        RankBy::SpeechCount => "speeches DESC, total DESC, word ASC",
    };
    let sql = format!(
        "SELECT word, SUM(count) AS total, COUNT(DISTINCT year) AS speeches, MAX(is_stopword)
         FROM word_count
         WHERE count > 0 {filter}
         GROUP BY word
         ORDER BY {order}
         LIMIT ?1"
    );
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let words = dataset.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(WordStats {
                word: row.get(0)?,
                total_count: count(row.get(1)?),
                speech_count: count(row.get(2)?),
                is_stopword: row.get(3)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    Ok(words)
}

/// Top `limit` words by total occurrences.
///
/// Ties break on number of speeches, then on the word. Stopwords are
/// excluded unless `include_stopwords` is set.
#[tracing::instrument(skip(dataset))]
pub fn most_used_words(
    dataset: &Dataset,
    limit: usize,
    include_stopwords: bool,
) -> QueryResult<Vec<WordStats>> {
    ranked_words(dataset, limit, include_stopwords, RankBy::TotalCount)
}

/// Top `limit` words by number of speeches mentioning them.
///
/// Ties break on total occurrences, then on the word.
#[tracing::instrument(skip(dataset))]
pub fn words_in_most_speeches(
    dataset: &Dataset,
    limit: usize,
    include_stopwords: bool,
) -> QueryResult<Vec<WordStats>> {
    ranked_words(dataset, limit, include_stopwords, RankBy::SpeechCount)
}

/// Top `limit` people or places by total mentions.
#[tracing::instrument(skip(dataset))]
pub fn most_used_entities(
    dataset: &Dataset,
    limit: usize,
    source: EntitySource,
) -> QueryResult<Vec<EntityStats>> {
    let sql = format!(
        "SELECT entity, SUM(count) AS total, COUNT(DISTINCT year) AS speeches
         FROM {}
         WHERE count > 0
         GROUP BY entity
         ORDER BY total DESC, speeches DESC, entity ASC
         LIMIT ?1",
        source.table()
    );
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let entities = dataset.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(EntityStats {
                entity: row.get(0)?,
                total_count: count(row.get(1)?),
                speech_count: count(row.get(2)?),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
    })?;
    Ok(entities)
}

/// Every word mentioned at least once, from both count tables.
///
/// A word tracked in the odds table is listed once, tagged
/// [`WordKind::Odds`], with its odds-table speech count. Ordered by speech
/// count descending, then case-insensitively by word.
#[tracing::instrument(skip(dataset))]
pub fn all_words_for_search(dataset: &Dataset) -> QueryResult<Vec<SearchEntry>> {
    let total = total_speeches(dataset)?;

    let (plain, odds) = dataset.with_conn(|conn| {
        let mut stmt = conn.prepare_cached(
            "SELECT word, MAX(is_stopword), COUNT(DISTINCT year)
             FROM word_count
             WHERE count > 0
             GROUP BY word",
        )?;
        let plain = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?, row.get::<_, i64>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare_cached(
            "SELECT word, COUNT(DISTINCT year)
             FROM odds_count
             WHERE count > 0
             GROUP BY word",
        )?;
        let odds = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((plain, odds))
    })?;

    let percentage = |speeches: u64| {
        if total == 0 {
            0.0
        } else {
            speeches as f64 / total as f64 * 100.0
        }
    };

    let odds_words: HashSet<&str> = odds.iter().map(|(w, _)| w.as_str()).collect();
    let mut entries: Vec<SearchEntry> = plain
        .iter()
        .filter(|(word, _, _)| !odds_words.contains(word.as_str()))
        .map(|(word, is_stopword, speeches)| SearchEntry {
            word: word.clone(),
            speech_count: count(*speeches),
            speech_percentage: percentage(count(*speeches)),
            is_stopword: *is_stopword,
            kind: WordKind::Word,
        })
        .collect();
    entries.extend(odds.iter().map(|(word, speeches)| SearchEntry {
        word: word.clone(),
        speech_count: count(*speeches),
        speech_percentage: percentage(count(*speeches)),
        is_stopword: false,
        kind: WordKind::Odds,
    }));

    entries.sort_by(|a, b| {
        b.speech_count
            .cmp(&a.speech_count)
            .then_with(|| a.word.to_lowercase().cmp(&b.word.to_lowercase()))
            .then_with(|| a.word.cmp(&b.word))
    });

    tracing::debug!(
        words = entries.len(),
        odds = odds_words.len(),
        "search index built"
    );
    Ok(entries)
}

/// Filter a search index by case-insensitive prefix, keeping its order.
///
/// An empty (or whitespace) prefix returns the first `limit` entries.
pub fn search_suggestions<'a>(
    entries: &'a [SearchEntry],
    prefix: &str,
    limit: usize,
) -> Vec<&'a SearchEntry> {
    let prefix = prefix.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| prefix.is_empty() || e.word.to_lowercase().starts_with(&prefix))
        .take(limit)
        .collect()
}
