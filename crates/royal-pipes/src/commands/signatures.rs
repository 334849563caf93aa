//! Signatures command: score one decade or monarch against the rest.

use anyhow::Context;
use clap::Args;
use royal_pipes_core::signature::{Prior, PriorBasis, SignatureWord};
use royal_pipes_core::source::ComparisonKind;
use royal_pipes_core::{Config, Facet, RequestCache, SignatureOptions};
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::style::Styled;

/// Arguments for the `signatures` subcommand.
#[derive(Args, Debug)]
pub struct SignaturesArgs {
    /// Slice the corpus by decade or by monarch.
    #[arg(value_enum)]
    pub kind: ComparisonKind,

    /// Decade (e.g. 1980s or 1987) or monarch name.
    pub value: String,

    /// Prior concentration.
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Which distribution shapes the prior.
    #[arg(long, value_enum)]
    pub prior: Option<PriorBasis>,

    /// Keep stopwords.
    #[arg(long)]
    pub stopwords: bool,

    /// Number of words to show.
    #[arg(long)]
    pub top: Option<usize>,
}

/// One on-demand scoring run, cut to the top words.
#[derive(Serialize)]
pub(crate) struct SignaturesReport {
    facet: Facet,
    alpha: f64,
    prior: PriorBasis,
    focal_corpus_size: u64,
    background_corpus_size: u64,
    vocabulary: usize,
    words: Vec<SignatureWord>,
}

/// Resolve scoring options: flags over config.
fn options(args: &SignaturesArgs, config: &Config) -> SignatureOptions {
    let configured = config.signature_options();
    let prior = Prior::new(args.alpha.unwrap_or(configured.prior.alpha))
        .with_basis(args.prior.unwrap_or(configured.prior.basis));
    SignatureOptions {
        prior,
        include_stopwords: args.stopwords || configured.include_stopwords,
    }
}

/// Score `facet` against the rest of the corpus and keep the first `top` words.
pub(crate) fn signatures_report(
    cache: &RequestCache<'_>,
    facet: Facet,
    options: SignatureOptions,
    top: usize,
) -> anyhow::Result<SignaturesReport> {
    let table = cache
        .signature_words_for(&facet, options)
        .with_context(|| format!("failed to score signature words for {facet}"))?;
    info!(words = table.words.len(), "signature words scored");
    Ok(SignaturesReport {
        alpha: table.alpha,
        prior: table.basis,
        focal_corpus_size: table.focal_corpus_size,
        background_corpus_size: table.background_corpus_size,
        vocabulary: table.words.len(),
        words: table.top(top).to_vec(),
        facet,
    })
}

/// Score signature words for one slice of the corpus on demand.
#[instrument(name = "cmd_signatures", skip_all, fields(kind = %args.kind, value = %args.value))]
pub fn cmd_signatures(
    args: SignaturesArgs,
    global_json: bool,
    config: &Config,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    let options = options(&args, config);
    let top = args.top.unwrap_or_else(|| config.top_k());
    debug!(?options, top, "executing signatures command");

    let facet = Facet::new(args.kind, &args.value)?;
    let report = signatures_report(cache, facet, options, top)?;

    if global_json {
        return super::print_json(&report);
    }
    println!(
        "{} {}",
        report.facet.to_string().bold(),
        format!(
            "alpha {} ({}), {} vs {} tokens, {} words",
            report.alpha,
            report.prior.as_str(),
            report.focal_corpus_size,
            report.background_corpus_size,
            report.vocabulary
        )
        .dimmed()
    );
    print_signature_words(&report.words);
    Ok(())
}

/// Print a ranked list of signature words, one per line.
pub(crate) fn print_signature_words(words: &[SignatureWord]) {
    if words.is_empty() {
        println!("  {}", "no signature words".yellow());
        return;
    }
    for word in words {
        println!(
            "  {:>3}. {}  {}  {}",
            word.rank,
            word.word.bold(),
            format!("{:+.2}", word.wlo_score).green(),
            format!(
                "z {:.2}, {} vs {}",
                word.z_score, word.focal_count, word.background_count
            )
            .dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SignaturesArgs {
        SignaturesArgs {
            kind: ComparisonKind::Decade,
            value: "1980s".to_string(),
            alpha: None,
            prior: None,
            stopwords: false,
            top: None,
        }
    }

    #[test]
    fn config_supplies_defaults() {
        let config = Config {
            alpha: Some(2.5),
            prior: PriorBasis::Pooled,
            ..Config::default()
        };
        let opts = options(&args(), &config);
        assert_eq!(opts.prior.alpha, 2.5);
        assert_eq!(opts.prior.basis, PriorBasis::Pooled);
        assert!(!opts.include_stopwords);
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            alpha: Some(2.5),
            ..Config::default()
        };
        let opts = options(
            &SignaturesArgs {
                alpha: Some(0.5),
                prior: Some(PriorBasis::Pooled),
                stopwords: true,
                ..args()
            },
            &config,
        );
        assert_eq!(opts.prior.alpha, 0.5);
        assert_eq!(opts.prior.basis, PriorBasis::Pooled);
        assert!(opts.include_stopwords);
    }
}
