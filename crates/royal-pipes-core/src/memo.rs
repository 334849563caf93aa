//! Request-scoped memoization over the query layer.
//!
//! A [`RequestCache`] lives for exactly one request (a CLI invocation or an
//! MCP tool call). Within that lifetime each query runs at most once per
//! distinct set of arguments; results are handed out as clones. Nothing is
//! shared between requests, so a refreshed dataset is picked up by the next
//! request. Failed queries are not cached.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::query::{
    self, Comparison, DecadeStats, EntityStats, Facet, MonarchStats, Mention, OddsWord,
    SearchEntry, SignatureOptions, Speech, WordStats, YearCount,
};
use crate::signature::{PriorBasis, SignatureTable};
use crate::source::{ComparisonKind, CountSource, EntitySource};

/// Function + arguments of a memoized query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum QueryKey {
    TotalSpeeches,
    WordTotal(String, CountSource),
    WordsByYear(String, CountSource),
    MostUsed(usize, bool),
    MostSpeeches(usize, bool),
    Entities(usize, EntitySource),
    SearchIndex,
    OddsWords,
    OddsLastMention(String),
    Speeches,
    Comparisons(ComparisonKind),
    // alpha by bit pattern so the key stays `Eq`
    Signature(Facet, u64, PriorBasis, bool),
}

/// Per-request cache in front of a [`Dataset`].
#[derive(Debug)]
pub struct RequestCache<'a> {
    dataset: &'a Dataset,
    entries: RefCell<HashMap<QueryKey, Box<dyn Any>>>,
    hits: Cell<usize>,
}

impl<'a> RequestCache<'a> {
    /// Start a fresh cache for one request.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
        }
    }

    /// The underlying dataset.
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Number of calls answered from the cache so far.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Number of distinct queries computed so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn memo<T, F>(&self, key: QueryKey, compute: F) -> QueryResult<T>
    where
        T: Clone + 'static,
        F: FnOnce(&Dataset) -> QueryResult<T>,
    {
        if let Some(cached) = self
            .entries
            .borrow()
            .get(&key)
            .and_then(|v| v.downcast_ref::<T>())
        {
            self.hits.set(self.hits.get() + 1);
            tracing::trace!(?key, "request cache hit");
            return Ok(cached.clone());
        }
        let value = compute(self.dataset)?;
        self.entries
            .borrow_mut()
            .insert(key, Box::new(value.clone()));
        Ok(value)
    }

    /// See [`query::total_speeches`].
    pub fn total_speeches(&self) -> QueryResult<u64> {
        self.memo(QueryKey::TotalSpeeches, query::total_speeches)
    }

    /// See [`query::word_total_count`].
    pub fn word_total_count(&self, word: &str, source: CountSource) -> QueryResult<u64> {
        self.memo(QueryKey::WordTotal(word.to_string(), source), |ds| {
            query::word_total_count(ds, word, source)
        })
    }

    /// See [`query::word_counts_by_year`].
    pub fn word_counts_by_year(
        &self,
        word: &str,
        source: CountSource,
    ) -> QueryResult<Vec<YearCount>> {
        self.memo(QueryKey::WordsByYear(word.to_string(), source), |ds| {
            query::word_counts_by_year(ds, word, source)
        })
    }

    /// See [`query::most_used_words`].
    pub fn most_used_words(
        &self,
        limit: usize,
        include_stopwords: bool,
    ) -> QueryResult<Vec<WordStats>> {
        self.memo(QueryKey::MostUsed(limit, include_stopwords), |ds| {
            query::most_used_words(ds, limit, include_stopwords)
        })
    }

    /// See [`query::words_in_most_speeches`].
    pub fn words_in_most_speeches(
        &self,
        limit: usize,
        include_stopwords: bool,
    ) -> QueryResult<Vec<WordStats>> {
        self.memo(QueryKey::MostSpeeches(limit, include_stopwords), |ds| {
            query::words_in_most_speeches(ds, limit, include_stopwords)
        })
    }

    /// See [`query::most_used_entities`].
    pub fn most_used_entities(
        &self,
        limit: usize,
        source: EntitySource,
    ) -> QueryResult<Vec<EntityStats>> {
        self.memo(QueryKey::Entities(limit, source), |ds| {
            query::most_used_entities(ds, limit, source)
        })
    }

    /// See [`query::all_words_for_search`].
    pub fn all_words_for_search(&self) -> QueryResult<Vec<SearchEntry>> {
        self.memo(QueryKey::SearchIndex, query::all_words_for_search)
    }

    /// See [`query::search_suggestions`]. Reuses the cached search index.
    pub fn search_suggestions(&self, prefix: &str, limit: usize) -> QueryResult<Vec<SearchEntry>> {
        let index = self.all_words_for_search()?;
        Ok(query::search_suggestions(&index, prefix, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    /// See [`query::all_odds_words`].
    pub fn all_odds_words(&self) -> QueryResult<Vec<OddsWord>> {
        self.memo(QueryKey::OddsWords, query::all_odds_words)
    }

    /// See [`query::odds_word_last_mention`].
    pub fn odds_word_last_mention(&self, word: &str) -> QueryResult<Option<Mention>> {
        self.memo(QueryKey::OddsLastMention(word.to_string()), |ds| {
            query::odds_word_last_mention(ds, word)
        })
    }

    /// See [`query::all_speeches`].
    pub fn all_speeches(&self) -> QueryResult<Vec<Speech>> {
        self.memo(QueryKey::Speeches, query::all_speeches)
    }

    /// See [`query::monarch_stats`]. Reuses the cached speech list.
    pub fn monarch_stats(&self) -> QueryResult<Vec<MonarchStats>> {
        Ok(query::monarch_stats(&self.all_speeches()?))
    }

    /// See [`query::decade_stats`]. Reuses the cached speech list.
    pub fn decade_stats(&self) -> QueryResult<Vec<DecadeStats>> {
        Ok(query::decade_stats(&self.all_speeches()?))
    }

    /// See [`query::comparisons`].
    pub fn comparisons(&self, kind: ComparisonKind) -> QueryResult<Vec<Comparison>> {
        self.memo(QueryKey::Comparisons(kind), |ds| query::comparisons(ds, kind))
    }

    /// See [`query::signature_words_for`].
    pub fn signature_words_for(
        &self,
        facet: &Facet,
        options: SignatureOptions,
    ) -> QueryResult<SignatureTable> {
        let key = QueryKey::Signature(
            facet.clone(),
            options.prior.alpha.to_bits(),
            options.prior.basis,
            options.include_stopwords,
        );
        self.memo(key, |ds| query::signature_words_for(ds, facet, options))
    }
}
