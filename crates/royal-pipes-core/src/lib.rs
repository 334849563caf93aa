//! Core library for royal-pipes.
//!
//! Lexical statistics over the corpus of Danish New Year's Eve speeches:
//! a signature-word scorer and a read-only query layer over the analytics
//! dataset, used by the `royal-pipes` CLI and MCP server.
//!
//! # Modules
//!
//! - [`signature`] - Weighted log-odds scoring with an informative Dirichlet prior
//! - [`dataset`] - Read-only handle to the SQLite dataset
//! - [`query`] - Aggregation queries (word series, rankings, odds, roll-ups)
//! - [`timeline`] - Summaries of one word's yearly series
//! - [`memo`] - Request-scoped memoization in front of the query layer
//! - [`source`] - Closed table selectors
//! - [`decade`] - Decade buckets
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use royal_pipes_core::{ConfigLoader, Dataset, RequestCache, source::CountSource};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let path = config.dataset_path().expect("no data home");
//! let dataset = Dataset::shared(&path).expect("dataset missing");
//! let cache = RequestCache::new(dataset);
//! let total = cache.word_total_count("danmark", CountSource::Word).unwrap();
//! println!("danmark: {total}");
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod dataset;
pub mod decade;
pub mod error;
pub mod memo;
pub mod query;
pub mod signature;
pub mod source;
pub mod timeline;

#[cfg(test)]
mod fixture;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use dataset::Dataset;
pub use decade::Decade;
pub use error::{
    ConfigError, ConfigResult, DatasetError, DatasetResult, QueryError, QueryResult, ScoreError,
    ScoreResult,
};
pub use memo::RequestCache;
pub use query::{Facet, SignatureOptions};
pub use signature::{Prior, PriorBasis, SignatureTable, SignatureWord, WordCounts};
