//! Records returned by the query layer.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for use in
//! both CLI JSON output and MCP tool responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decade::Decade;
use crate::signature::SignatureWord;
use crate::source::ComparisonKind;

/// One speech year on a word's time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct YearCount {
    /// Speech year.
    pub year: i32,
    /// Occurrences that year (0 when not mentioned).
    pub count: u64,
    /// Monarch who gave the speech.
    pub monarch: String,
}

/// Word ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordStats {
    /// The word.
    pub word: String,
    /// Occurrences across all speeches.
    pub total_count: u64,
    /// Number of speeches mentioning it.
    pub speech_count: u64,
    /// Whether the word is a stopword.
    pub is_stopword: bool,
}

/// Person or place ranking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityStats {
    /// Entity name as extracted.
    pub entity: String,
    /// Mentions across all speeches.
    pub total_count: u64,
    /// Number of speeches mentioning it.
    pub speech_count: u64,
}

/// Which table a search entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WordKind {
    /// Plain word from `word_count`.
    Word,
    /// Betting-pool word from `odds_count`.
    Odds,
}

/// One searchable word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntry {
    /// The word.
    pub word: String,
    /// Number of speeches mentioning it.
    pub speech_count: u64,
    /// `speech_count / total_speeches * 100`.
    pub speech_percentage: f64,
    /// Whether the word is a stopword (always `false` for odds words).
    pub is_stopword: bool,
    /// Source table; odds wins when a word is in both.
    #[serde(rename = "type")]
    pub kind: WordKind,
}

/// Year and monarch of a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Mention {
    /// Speech year.
    pub year: i32,
    /// Monarch who gave the speech.
    pub monarch: String,
}

/// Whether an odds word was said in one recent speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecentMention {
    /// Speech year.
    pub year: i32,
    /// `true` if the word occurred at least once.
    pub mentioned: bool,
}

/// A betting-pool word with its recent track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OddsWord {
    /// The word.
    pub word: String,
    /// Market odds; lower means more likely.
    pub odds: f64,
    /// Most recent speech mentioning the word, if any.
    pub last_mentioned: Option<Mention>,
    /// Mention flags for the most recent speeches, newest first.
    pub recent: Vec<RecentMention>,
}

/// One speech with its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Speech {
    /// Speech year.
    pub year: i32,
    /// Monarch who gave it.
    pub monarch: String,
    /// Sum of all word counts for the year.
    pub word_count: u64,
}

/// Per-monarch roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonarchStats {
    /// Monarch name.
    pub monarch: String,
    /// Speeches given.
    pub speech_count: usize,
    /// First speech year.
    pub first_year: i32,
    /// Last speech year.
    pub last_year: i32,
    /// Mean words per speech.
    pub average_words: f64,
}

/// Per-decade roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecadeStats {
    /// First year of the decade.
    pub decade: Decade,
    /// Display label, e.g. "1980s".
    pub label: String,
    /// Monarchs who spoke that decade, in order of first speech.
    pub monarchs: Vec<String>,
    /// Speeches in the decade.
    pub speech_count: usize,
    /// Mean words per speech.
    pub average_words: f64,
}

/// A persisted signature-word comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comparison {
    /// Row id.
    pub id: i64,
    /// Slice type.
    pub kind: ComparisonKind,
    /// The decade label or monarch name characterized.
    pub focal_value: String,
    /// What the focal slice was compared against.
    pub background_type: String,
    /// Prior concentration used for the run.
    pub alpha: f64,
    /// Tokens in the focal slice.
    pub focal_corpus_size: u64,
    /// Tokens in the background.
    pub background_corpus_size: u64,
    /// Every scored word, by rank.
    pub signature_words: Vec<SignatureWord>,
}
