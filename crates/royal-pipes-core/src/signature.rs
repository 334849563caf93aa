//! Signature-word scoring: weighted log-odds with an informative Dirichlet prior.
//!
//! Ranks the words of a *focal* corpus by how distinctively it uses them
//! compared to a *background* corpus (Monroe, Colaresi & Quinn, 2008).
//!
//! For each word `w` in the union vocabulary of size `V`:
//!
//! ```text
//! a_w   = alpha * (p_w + 1) / (N_p + V)          prior pseudocount
//! δ_f   = ln((f_w + a_w) / (n_f + alpha - f_w - a_w))
//! δ_b   = ln((b_w + a_w) / (n_b + alpha - b_w - a_w))
//! Δ     = δ_f - δ_b                                 wlo_score
//! σ²    = 1 / (f_w + a_w) + 1 / (b_w + a_w)
//! z     = Δ / σ                                     z_score
//! ```
//!
//! `p_w` / `N_p` come from the prior basis: the background counts by default,
//! or focal + background combined with [`PriorBasis::Pooled`]. Either way the
//! pseudocounts sum to `alpha` and stay strictly positive, so every statistic
//! is finite even for words that never occur on one side.
//!
//! Output is ordered by `wlo_score` descending, ties broken by word ascending,
//! with dense 1-based ranks. The procedure is a pure function of its inputs.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusSide, ScoreError, ScoreResult};

/// Default prior concentration used when none is configured.
pub const DEFAULT_ALPHA: f64 = 10.0;

/// Word → occurrence count for one side of a comparison.
///
/// Backed by a `BTreeMap` so iteration (and therefore floating-point
/// summation order) is the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCounts(BTreeMap<String, u64>);

impl WordCounts {
    /// Create an empty count vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `word`.
    pub fn add(&mut self, word: impl Into<String>, count: u64) {
        *self.0.entry(word.into()).or_insert(0) += count;
    }

    /// Occurrences of `word`, 0 if absent.
    pub fn get(&self, word: &str) -> u64 {
        self.0.get(word).copied().unwrap_or(0)
    }

    /// Total tokens on this side.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct words, including any present with count 0.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no word has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(word, count)` in word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for WordCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (word, count) in iter {
            counts.add(word, count);
        }
        counts
    }
}

/// Which distribution shapes the prior pseudocounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PriorBasis {
    /// Smoothed background frequencies.
    #[default]
    Background,
    /// Smoothed frequencies of focal and background combined.
    ///
    /// Symmetric in its inputs: swapping the two corpora negates every score.
    Pooled,
}

impl PriorBasis {
    /// Returns the basis as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Pooled => "pooled",
        }
    }
}

/// Informative Dirichlet prior parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Prior {
    /// Total prior mass (concentration).
    pub alpha: f64,
    /// Distribution the mass is spread over.
    pub basis: PriorBasis,
}

impl Default for Prior {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            basis: PriorBasis::Background,
        }
    }
}

impl Prior {
    /// Background-shaped prior with the given concentration.
    pub const fn new(alpha: f64) -> Self {
        Self {
            alpha,
            basis: PriorBasis::Background,
        }
    }

    /// Replace the prior basis.
    pub const fn with_basis(mut self, basis: PriorBasis) -> Self {
        self.basis = basis;
        self
    }
}

/// One ranked word of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignatureWord {
    /// Dense 1-based rank (1 = most distinctive of the focal corpus).
    pub rank: usize,
    /// The word.
    pub word: String,
    /// Posterior log-odds difference, focal minus background.
    pub wlo_score: f64,
    /// `wlo_score` divided by its estimated standard error.
    pub z_score: f64,
    /// Raw occurrences in the focal corpus.
    pub focal_count: u64,
    /// Raw occurrences in the background corpus.
    pub background_count: u64,
    /// `focal_count / focal_corpus_size`.
    pub focal_rate: f64,
    /// `background_count / background_corpus_size`.
    pub background_rate: f64,
}

/// Full ranked output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignatureTable {
    /// Prior concentration used.
    pub alpha: f64,
    /// Prior basis used.
    pub basis: PriorBasis,
    /// Total tokens in the focal corpus.
    pub focal_corpus_size: u64,
    /// Total tokens in the background corpus.
    pub background_corpus_size: u64,
    /// Every vocabulary word, ordered by rank.
    pub words: Vec<SignatureWord>,
}

impl SignatureTable {
    /// The `k` highest-ranked words.
    pub fn top(&self, k: usize) -> &[SignatureWord] {
        &self.words[..k.min(self.words.len())]
    }

    /// Look a word up by value.
    pub fn word(&self, word: &str) -> Option<&SignatureWord> {
        self.words.iter().find(|w| w.word == word)
    }
}

/// Score every word in `focal ∪ background` and rank by distinctiveness.
///
/// # Errors
///
/// - [`ScoreError::InvalidAlpha`] if `prior.alpha` is not positive and finite.
/// - [`ScoreError::EmptyCorpus`] if either side sums to zero tokens.
/// - [`ScoreError::DegenerateVocabulary`] if fewer than two distinct words exist.
#[tracing::instrument(skip(focal, background), fields(
    focal_words = focal.len(),
    background_words = background.len(),
    alpha = prior.alpha,
    basis = prior.basis.as_str(),
))]
pub fn score_signature_words(
    focal: &WordCounts,
    background: &WordCounts,
    prior: Prior,
) -> ScoreResult<SignatureTable> {
    let alpha = prior.alpha;
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(ScoreError::InvalidAlpha(alpha));
    }

    let n_f = focal.total();
    let n_b = background.total();
    if n_f == 0 {
        return Err(ScoreError::EmptyCorpus(CorpusSide::Focal));
    }
    if n_b == 0 {
        return Err(ScoreError::EmptyCorpus(CorpusSide::Background));
    }

    let mut vocabulary: Vec<&str> = focal.0.keys().map(String::as_str).collect();
    vocabulary.extend(
        background
            .0
            .keys()
            .map(String::as_str)
            .filter(|w| !focal.0.contains_key(*w)),
    );
    vocabulary.sort_unstable();
    let v = vocabulary.len();
    if v < 2 {
        return Err(ScoreError::DegenerateVocabulary { size: v });
    }

    let prior_total = match prior.basis {
        PriorBasis::Background => n_b,
        PriorBasis::Pooled => n_f + n_b,
    } as f64;
    let denom = prior_total + v as f64;
    let n_f = n_f as f64;
    let n_b = n_b as f64;

    let mut words = Vec::with_capacity(v);
    for word in vocabulary {
        let f = focal.get(word);
        let b = background.get(word);
        let basis_count = match prior.basis {
            PriorBasis::Background => b,
            PriorBasis::Pooled => f + b,
        };
        let a_w = alpha * (basis_count as f64 + 1.0) / denom;

        let f_post = f as f64 + a_w;
        let b_post = b as f64 + a_w;
        let delta_f = (f_post / (n_f + alpha - f_post)).ln();
        let delta_b = (b_post / (n_b + alpha - b_post)).ln();
        let wlo_score = delta_f - delta_b;
        let variance = f_post.recip() + b_post.recip();
        let z_score = wlo_score / variance.sqrt();

        if !(wlo_score.is_finite() && z_score.is_finite()) {
            return Err(ScoreError::NonFinite {
                word: word.to_string(),
            });
        }

        words.push(SignatureWord {
            rank: 0,
            word: word.to_string(),
            wlo_score,
            z_score,
            focal_count: f,
            background_count: b,
            focal_rate: f as f64 / n_f,
            background_rate: b as f64 / n_b,
        });
    }

    // Vocabulary is already in word order, so a stable sort on score alone
    // keeps ties ordered by word.
    words.sort_by(by_score_desc);
    for (i, w) in words.iter_mut().enumerate() {
        w.rank = i + 1;
    }

    tracing::debug!(vocabulary = v, "signature words scored");

    Ok(SignatureTable {
        alpha,
        basis: prior.basis,
        focal_corpus_size: n_f as u64,
        background_corpus_size: n_b as u64,
        words,
    })
}

fn by_score_desc(a: &SignatureWord, b: &SignatureWord) -> Ordering {
    b.wlo_score.total_cmp(&a.wlo_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> WordCounts {
        pairs.iter().map(|(w, c)| (*w, *c)).collect()
    }

    fn sample() -> (WordCounts, WordCounts) {
        let focal = counts(&[
            ("danmark", 40),
            ("grønland", 12),
            ("krig", 2),
            ("og", 120),
            ("tak", 9),
        ]);
        let background = counts(&[
            ("danmark", 200),
            ("europa", 30),
            ("krig", 25),
            ("og", 800),
            ("tak", 60),
        ]);
        (focal, background)
    }

    #[test]
    fn distinctive_focal_word_ranks_first() {
        let (focal, background) = sample();
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        assert_eq!(table.words[0].word, "grønland");
        assert!(table.words[0].wlo_score > 0.0);
        assert!(table.words[0].z_score > 0.0);
    }

    #[test]
    fn background_only_word_scores_negative() {
        let (focal, background) = sample();
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        let europa = table.word("europa").unwrap();
        assert_eq!(europa.focal_count, 0);
        assert!(europa.wlo_score < 0.0);
        assert_eq!(europa.rank, table.words.len());
    }

    #[test]
    fn ranks_are_dense_and_scores_non_increasing() {
        let (focal, background) = sample();
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        assert_eq!(table.words.len(), 6);
        for (i, w) in table.words.iter().enumerate() {
            assert_eq!(w.rank, i + 1);
        }
        for pair in table.words.windows(2) {
            assert!(pair[0].wlo_score >= pair[1].wlo_score);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (focal, background) = sample();
        let prior = Prior::new(3.5);
        let first = score_signature_words(&focal, &background, prior).unwrap();
        for _ in 0..5 {
            let again = score_signature_words(&focal, &background, prior).unwrap();
            assert_eq!(first, again);
        }
        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&score_signature_words(&focal, &background, prior).unwrap())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ties_break_by_word() {
        // Identical counts on both sides give identical scores.
        let focal = counts(&[("c", 5), ("a", 5), ("b", 5)]);
        let background = counts(&[("c", 5), ("a", 5), ("b", 5)]);
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        let order: Vec<_> = table.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn zero_on_both_sides_stays_finite() {
        let mut focal = counts(&[("kongen", 10), ("folket", 4)]);
        focal.add("tavshed", 0);
        let background = counts(&[("kongen", 30), ("folket", 20)]);
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        let silent = table.word("tavshed").unwrap();
        assert!(silent.wlo_score.is_finite());
        assert!(silent.z_score.is_finite());
        assert_eq!(silent.focal_rate, 0.0);
        assert_eq!(silent.background_rate, 0.0);
    }

    #[test]
    fn pooled_prior_is_antisymmetric() {
        let (focal, background) = sample();
        let prior = Prior::new(10.0).with_basis(PriorBasis::Pooled);
        let forward = score_signature_words(&focal, &background, prior).unwrap();
        let reverse = score_signature_words(&background, &focal, prior).unwrap();

        for w in &forward.words {
            let r = reverse.word(&w.word).unwrap();
            assert_eq!(w.wlo_score, -r.wlo_score, "word {}", w.word);
            assert_eq!(w.z_score, -r.z_score, "word {}", w.word);
            assert_eq!(w.focal_count, r.background_count);
        }

        let fwd: Vec<_> = forward.words.iter().map(|w| w.word.as_str()).collect();
        let mut rev: Vec<_> = reverse.words.iter().map(|w| w.word.as_str()).collect();
        rev.reverse();
        assert_eq!(fwd, rev);
    }

    #[test]
    fn background_prior_flips_sign_on_swap() {
        let (focal, background) = sample();
        let forward = score_signature_words(&focal, &background, Prior::default()).unwrap();
        let reverse = score_signature_words(&background, &focal, Prior::default()).unwrap();
        assert!(forward.word("grønland").unwrap().wlo_score > 0.0);
        assert!(reverse.word("grønland").unwrap().wlo_score < 0.0);
        assert!(reverse.word("europa").unwrap().wlo_score > 0.0);
    }

    #[test]
    fn prior_mass_sums_to_alpha() {
        // Recompute pseudocounts the same way the scorer does.
        let (_, background) = sample();
        let alpha = 7.0;
        let v = 6.0; // union vocabulary of the sample
        let denom = background.total() as f64 + v;
        let words = ["danmark", "europa", "grønland", "krig", "og", "tak"];
        let total: f64 = words
            .iter()
            .map(|w| alpha * (background.get(w) as f64 + 1.0) / denom)
            .sum();
        assert!((total - alpha).abs() < 1e-9);
    }

    #[test]
    fn rates_use_corpus_sizes() {
        let (focal, background) = sample();
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        assert_eq!(table.focal_corpus_size, 183);
        assert_eq!(table.background_corpus_size, 1115);
        let og = table.word("og").unwrap();
        assert!((og.focal_rate - 120.0 / 183.0).abs() < 1e-12);
        assert!((og.background_rate - 800.0 / 1115.0).abs() < 1e-12);
    }

    #[test]
    fn top_clamps_to_length() {
        let (focal, background) = sample();
        let table = score_signature_words(&focal, &background, Prior::default()).unwrap();
        assert_eq!(table.top(3).len(), 3);
        assert_eq!(table.top(100).len(), 6);
        assert_eq!(table.top(1)[0].rank, 1);
    }

    #[test]
    fn empty_focal_is_degenerate() {
        let (_, background) = sample();
        let err = score_signature_words(&WordCounts::new(), &background, Prior::default())
            .unwrap_err();
        assert_eq!(err, ScoreError::EmptyCorpus(CorpusSide::Focal));
        assert!(err.is_degenerate());
    }

    #[test]
    fn all_zero_background_is_degenerate() {
        let (focal, _) = sample();
        let background = counts(&[("danmark", 0)]);
        let err = score_signature_words(&focal, &background, Prior::default()).unwrap_err();
        assert_eq!(err, ScoreError::EmptyCorpus(CorpusSide::Background));
    }

    #[test]
    fn single_word_vocabulary_is_degenerate() {
        let focal = counts(&[("godt", 3)]);
        let background = counts(&[("godt", 8)]);
        let err = score_signature_words(&focal, &background, Prior::default()).unwrap_err();
        assert_eq!(err, ScoreError::DegenerateVocabulary { size: 1 });
        assert!(err.is_degenerate());
    }

    #[test]
    fn rejects_bad_alpha() {
        let (focal, background) = sample();
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = score_signature_words(&focal, &background, Prior::new(alpha)).unwrap_err();
            assert!(matches!(err, ScoreError::InvalidAlpha(_)));
        }
    }
}
