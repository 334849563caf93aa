//! Error types for royal-pipes-core.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::decade::ParseDecadeError;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which side of a comparison was found empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusSide {
    /// The corpus being characterized.
    Focal,
    /// The corpus it is contrasted against.
    Background,
}

impl CorpusSide {
    /// Lowercase name used in messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focal => "focal",
            Self::Background => "background",
        }
    }
}

/// Errors raised by the signature-word scorer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// One side of the comparison has no tokens.
    #[error("{} corpus is empty", .0.as_str())]
    EmptyCorpus(CorpusSide),

    /// The shared vocabulary is too small to form log-odds.
    ///
    /// With a single word the complement count is zero on both sides and the
    /// odds are unbounded, so at least two words are required.
    #[error("vocabulary has {size} word(s); at least 2 are required")]
    DegenerateVocabulary {
        /// Number of distinct words across both corpora.
        size: usize,
    },

    /// The prior concentration must be a positive, finite number.
    #[error("alpha must be positive and finite, got {0}")]
    InvalidAlpha(f64),

    /// A computed statistic came out NaN or infinite.
    #[error("non-finite score for word {word:?}")]
    NonFinite {
        /// The word whose statistic overflowed.
        word: String,
    },
}

impl ScoreError {
    /// Returns `true` for the degenerate-corpus family of errors.
    pub const fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::EmptyCorpus(_) | Self::DegenerateVocabulary { .. }
        )
    }
}

/// Result type alias using [`ScoreError`].
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors that can occur when opening or reading the dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The dataset file does not exist. It is never created on demand.
    #[error("dataset not found at {path}")]
    NotFound {
        /// The path that was probed.
        path: Utf8PathBuf,
    },

    /// No data home could be determined (no `XDG_DATA_HOME`, no home directory).
    #[error("cannot determine data directory; set XDG_DATA_HOME or `database` in config")]
    NoDataHome,

    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias using [`DatasetError`].
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors surfaced by the query layer.
#[derive(Error, Debug)]
pub enum QueryError {
    /// An unrecognized table selector was requested.
    #[error("unknown source: {name}. Use: {available}")]
    InvalidSource {
        /// The selector that was requested.
        name: String,
        /// Comma-separated list of valid selectors.
        available: String,
    },

    /// A decade label could not be parsed.
    #[error(transparent)]
    InvalidDecade(#[from] ParseDecadeError),

    /// Reading the dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// On-demand scoring failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
}

impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Dataset(DatasetError::Sqlite(err))
    }
}

/// Result type alias using [`QueryError`].
pub type QueryResult<T> = Result<T, QueryError>;
