//! Read-only aggregation queries over the dataset.
//!
//! Every function takes a [`Dataset`](crate::dataset::Dataset) and returns
//! plain records from [`reports`]. A word or entity that never occurs yields
//! zero counts, empty lists, or `None`, never an error. Table selectors are
//! closed enums ([`CountSource`](crate::source::CountSource),
//! [`EntitySource`](crate::source::EntitySource)), so the SQL only ever names
//! a known table.
//!
//! Roll-ups that only reshape already-loaded rows ([`monarch_stats`],
//! [`decade_stats`], [`search_suggestions`]) take those rows instead of the
//! dataset.

mod comparisons;
mod corpus;
mod odds;
pub mod reports;
mod words;

pub use comparisons::{Facet, SignatureOptions, comparisons, signature_words_for};
pub use corpus::{all_speeches, decade_stats, monarch_stats, total_speeches};
pub use odds::{RECENT_SPEECHES, all_odds_words, odds_word_last_mention};
pub use reports::{
    Comparison, DecadeStats, EntityStats, Mention, MonarchStats, OddsWord, RecentMention,
    SearchEntry, Speech, WordKind, WordStats, YearCount,
};
pub use words::{
    all_words_for_search, most_used_entities, most_used_words, search_suggestions,
    word_counts_by_year, word_total_count, words_in_most_speeches,
};
