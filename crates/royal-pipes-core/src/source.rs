//! Closed table selectors.
//!
//! Several queries run the same SQL against one of two parallel tables. The
//! choice is an enum rather than a table name string, so only known tables
//! ever reach a query. Parsing from text is the one place an unknown
//! selector can appear, and it fails with [`QueryError::InvalidSource`].

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

fn invalid(name: &str, available: &[&str]) -> QueryError {
    QueryError::InvalidSource {
        name: name.to_string(),
        available: available.join(", "),
    }
}

/// Per-word, per-year count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CountSource {
    /// Every word of every speech (`word_count`).
    Word,
    /// Curated betting-pool words (`odds_count`).
    Odds,
}

impl CountSource {
    /// Accepted selector names.
    pub const NAMES: &'static [&'static str] = &["word", "odds"];

    /// Backing table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Word => "word_count",
            Self::Odds => "odds_count",
        }
    }

    /// Returns the selector as a lowercase string slice.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Odds => "odds",
        }
    }
}

impl FromStr for CountSource {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" | "word_count" => Ok(Self::Word),
            "odds" | "odds_count" => Ok(Self::Odds),
            other => Err(invalid(other, Self::NAMES)),
        }
    }
}

impl std::fmt::Display for CountSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named-entity count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum EntitySource {
    /// People mentioned (`person_count`).
    Person,
    /// Places mentioned (`place_count`).
    Place,
}

impl EntitySource {
    /// Accepted selector names.
    pub const NAMES: &'static [&'static str] = &["person", "place"];

    /// Backing table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Person => "person_count",
            Self::Place => "place_count",
        }
    }

    /// Returns the selector as a lowercase string slice.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
        }
    }
}

impl FromStr for EntitySource {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" | "person_count" => Ok(Self::Person),
            "place" | "place_count" => Ok(Self::Place),
            other => Err(invalid(other, Self::NAMES)),
        }
    }
}

impl std::fmt::Display for EntitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a signature-word comparison slices the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ComparisonKind {
    /// One decade against every other decade.
    Decade,
    /// One monarch against every other monarch.
    Monarch,
}

impl ComparisonKind {
    /// Accepted selector names.
    pub const NAMES: &'static [&'static str] = &["decade", "monarch"];

    /// Value stored in `wlo_comparisons.comparison_type`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decade => "decade",
            Self::Monarch => "monarch",
        }
    }
}

impl FromStr for ComparisonKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decade" => Ok(Self::Decade),
            "monarch" => Ok(Self::Monarch),
            other => Err(invalid(other, Self::NAMES)),
        }
    }
}

impl std::fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
