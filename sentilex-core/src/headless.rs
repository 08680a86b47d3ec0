// sentilex-core/src/headless.rs
//! One-shot helpers for scoring a single text without managing scorers.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::config::SentilexConfig;
use crate::method::build_dictionary_method;

/// Result of a single dictionary analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// `None` when no search term occurs in the text.
    pub polarity: Option<f64>,
    /// Per-sentence scores, in sentence text order.
    pub sentences: BTreeMap<String, f64>,
    /// Tokens that contained a search term and were excluded from scoring.
    pub compound_terms: BTreeMap<String, f64>,
}

/// Scores `text` with the dictionary method built from `config`.
///
/// A fresh scorer is built per call, so the outcome never depends on earlier calls.
pub fn headless_analyse(config: &SentilexConfig, text: &str) -> Result<AnalysisOutcome> {
    let mut config = config.clone();
    config.dictionary.trace_sentences = true;
    config.dictionary.additive = false;

    let mut method = build_dictionary_method(&config)?;
    let terms = config.normalized_search_terms();
    let polarity = method.scorer_mut().score_detailed(text, &terms)?;

    let scorer = method.scorer();
    Ok(AnalysisOutcome {
        polarity,
        sentences: scorer.sentence_trace().clone().into_iter().collect(),
        compound_terms: scorer.compound_terms().clone().into_iter().collect(),
    })
}
