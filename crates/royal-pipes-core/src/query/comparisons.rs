//! Signature-word comparisons: the persisted tables, and on-demand scoring
//! straight from `word_count`.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, count};
use crate::decade::Decade;
use crate::error::QueryResult;
use crate::signature::{Prior, SignatureTable, SignatureWord, WordCounts, score_signature_words};
use crate::source::ComparisonKind;

use super::reports::Comparison;

/// Every persisted comparison of `kind`, with its full ranked word list.
///
/// Monarchs come out in reign order, decades in chronological order.
#[tracing::instrument(skip(dataset))]
pub fn comparisons(dataset: &Dataset, kind: ComparisonKind) -> QueryResult<Vec<Comparison>> {
    let (mut heads, words) = dataset.with_conn(|conn| {
        let heads = conn
            .prepare_cached(
                "SELECT c.comparison_id, c.focal_value, c.background_type, c.alpha,
                        c.focal_corpus_size, c.background_corpus_size
                 FROM wlo_comparisons c
                 WHERE c.comparison_type = ?1
                 ORDER BY (SELECT MIN(s.year) FROM speech s WHERE s.monarch = c.focal_value),
                          c.focal_value",
            )?
            .query_map([kind.as_str()], |row| {
                Ok(Comparison {
                    id: row.get(0)?,
                    kind,
                    focal_value: row.get(1)?,
                    background_type: row.get(2)?,
                    alpha: row.get(3)?,
                    focal_corpus_size: count(row.get(4)?),
                    background_corpus_size: count(row.get(5)?),
                    signature_words: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let words = conn
            .prepare_cached(
                "SELECT w.comparison_id, w.rank, w.word, w.wlo_score, w.z_score,
                        w.focal_count, w.background_count, w.focal_rate, w.background_rate
                 FROM wlo_words w
                 JOIN wlo_comparisons c ON c.comparison_id = w.comparison_id
                 WHERE c.comparison_type = ?1
                 ORDER BY w.comparison_id, w.rank",
            )?
            .query_map([kind.as_str()], |row| {
                let rank = count(row.get(1)?);
                Ok((
                    row.get::<_, i64>(0)?,
                    SignatureWord {
                        rank: usize::try_from(rank).unwrap_or(usize::MAX),
                        word: row.get(2)?,
                        wlo_score: row.get(3)?,
                        z_score: row.get(4)?,
                        focal_count: count(row.get(5)?),
                        background_count: count(row.get(6)?),
                        focal_rate: row.get(7)?,
                        background_rate: row.get(8)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((heads, words))
    })?;

    let mut by_id: BTreeMap<i64, Vec<SignatureWord>> = BTreeMap::new();
    for (id, word) in words {
        by_id.entry(id).or_default().push(word);
    }
    for head in &mut heads {
        head.signature_words = by_id.remove(&head.id).unwrap_or_default();
    }
    tracing::debug!(comparisons = heads.len(), kind = %kind, "comparisons loaded");
    Ok(heads)
}

/// The slice of speeches a signature table characterizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Facet {
    /// Speeches given in one decade.
    Decade(Decade),
    /// Speeches given by one monarch.
    Monarch(String),
}

impl Facet {
    /// Build a facet of `kind` from a user-supplied value.
    ///
    /// Decades accept `"1980s"` or any year inside the decade.
    pub fn new(kind: ComparisonKind, value: &str) -> QueryResult<Self> {
        Ok(match kind {
            ComparisonKind::Decade => Self::Decade(value.parse()?),
            ComparisonKind::Monarch => Self::Monarch(value.trim().to_string()),
        })
    }

    /// Whether the speech at `year` by `monarch` is in the facet.
    pub fn contains(&self, year: i32, monarch: &str) -> bool {
        match self {
            Self::Decade(decade) => decade.contains(year),
            Self::Monarch(name) => name == monarch,
        }
    }

    /// Which kind of comparison this facet belongs to.
    pub const fn kind(&self) -> ComparisonKind {
        match self {
            Self::Decade(_) => ComparisonKind::Decade,
            Self::Monarch(_) => ComparisonKind::Monarch,
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decade(decade) => write!(f, "{decade}"),
            Self::Monarch(name) => f.write_str(name),
        }
    }
}

/// Knobs for on-demand scoring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignatureOptions {
    /// Prior concentration and basis.
    pub prior: Prior,
    /// Keep stopwords in both corpora.
    pub include_stopwords: bool,
}

/// Score the signature words of `facet` against every other speech.
///
/// Counts come from `word_count`. Stopwords are dropped from both sides
/// unless `options.include_stopwords` is set.
///
/// # Errors
///
/// Scorer failures propagate as [`QueryError::Score`](crate::error::QueryError::Score);
/// a facet with no speeches is an empty focal corpus.
#[tracing::instrument(skip(dataset, facet), fields(facet = %facet))]
pub fn signature_words_for(
    dataset: &Dataset,
    facet: &Facet,
    options: SignatureOptions,
) -> QueryResult<SignatureTable> {
    let rows = dataset.with_conn(|conn| {
        conn.prepare_cached(
            "SELECT w.word, w.year, s.monarch, w.count, w.is_stopword
             FROM word_count w
             JOIN speech s ON s.year = w.year
             WHERE w.count > 0",
        )?
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, bool>(4)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
    })?;

    let mut focal = WordCounts::new();
    let mut background = WordCounts::new();
    for (word, year, monarch, n, is_stopword) in rows {
        if is_stopword && !options.include_stopwords {
            continue;
        }
        let side = if facet.contains(year, &monarch) {
            &mut focal
        } else {
            &mut background
        };
        side.add(word, count(n));
    }
    tracing::debug!(
        focal_tokens = focal.total(),
        background_tokens = background.total(),
        "corpora partitioned"
    );

    let table = score_signature_words(&focal, &background, options.prior)?;
    tracing::info!(vocabulary = table.words.len(), "signature table computed");
    Ok(table)
}
