//! Betting-pool words and their recent track record.

use std::collections::{HashMap, HashSet};

use rusqlite::OptionalExtension;

use crate::dataset::Dataset;
use crate::error::QueryResult;

use super::reports::{Mention, OddsWord, RecentMention};

/// Number of most recent speeches shown per odds word.
pub const RECENT_SPEECHES: usize = 5;

/// Most recent speech in which `word` occurs in `odds_count`.
#[tracing::instrument(skip(dataset))]
pub fn odds_word_last_mention(dataset: &Dataset, word: &str) -> QueryResult<Option<Mention>> {
    let mention = dataset.with_conn(|conn| {
        conn.prepare_cached(
            "SELECT s.year, s.monarch
             FROM odds_count c
             JOIN speech s ON s.year = c.year
             WHERE c.word = ?1 AND c.count > 0
             ORDER BY s.year DESC
             LIMIT 1",
        )?
        .query_row([word], |row| {
            Ok(Mention {
                year: row.get(0)?,
                monarch: row.get(1)?,
            })
        })
        .optional()
    })?;
    Ok(mention)
}

/// Every word in the betting pool, likeliest first.
///
/// Ordered by odds ascending, then by word. Each entry carries its last
/// mention and one flag per speech among the [`RECENT_SPEECHES`] most
/// recent, newest first.
#[tracing::instrument(skip(dataset))]
pub fn all_odds_words(dataset: &Dataset) -> QueryResult<Vec<OddsWord>> {
    let (pool, recent_years, hits, last) = dataset.with_conn(|conn| {
        let pool = conn
            .prepare_cached("SELECT word, odds FROM odds ORDER BY odds ASC, word ASC")?
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let limit = i64::try_from(RECENT_SPEECHES).unwrap_or(i64::MAX);
        let recent_years = conn
            .prepare_cached("SELECT year FROM speech ORDER BY year DESC LIMIT ?1")?
            .query_map([limit], |row| row.get::<_, i32>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let hits = conn
            .prepare_cached("SELECT word, year FROM odds_count WHERE count > 0")?
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)?)))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;

        // SQLite takes the bare `monarch` from the row holding MAX(year)
        let last = conn
            .prepare_cached(
                "SELECT c.word, MAX(s.year), s.monarch
                 FROM odds_count c
                 JOIN speech s ON s.year = c.year
                 WHERE c.count > 0
                 GROUP BY c.word",
            )?
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Mention {
                        year: row.get(1)?,
                        monarch: row.get(2)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok((pool, recent_years, hits, last))
    })?;

    let mut words = Vec::with_capacity(pool.len());
    for (word, odds) in pool {
        let recent = recent_years
            .iter()
            .map(|&year| RecentMention {
                year,
                mentioned: hits.contains(&(word.clone(), year)),
            })
            .collect();
        let last_mentioned = last.get(&word).cloned();
        words.push(OddsWord {
            word,
            odds,
            last_mentioned,
            recent,
        });
    }
    tracing::debug!(words = words.len(), "odds pool loaded");
    Ok(words)
}
