//! Keyword-scoped, negation-aware lexicon scorer.
//!
//! Only sentences that mention a search term are scored. Inside such a
//! sentence every lexicon-bearing token contributes `weight * sign`, where
//! `sign` comes from the [`NegationDetector`]. Tokens that themselves contain
//! a search term are never scored (they are counted in
//! [`ScoringState::compound_terms`] instead) so the term's own polarity does
//! not bias the result. A call's sum is divided by the number of contributing
//! tokens, giving an approximate mean per-word polarity on the `[-1, 1]` scale.
//!
//! A scorer owns its [`ScoringState`]. Concurrent workers must each build
//! their own scorer.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use sentilex_stats::matcher::TermMatcher;
use sentilex_stats::scoring::clamp_polarity;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::SentilexError;
use crate::lexicon::Lexicon;
use crate::negation::NegationDetector;
use crate::parse::DependencyParser;

/// Behavioural switches for a [`DictionaryScorer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScorerOptions {
    /// Accumulate across calls instead of resetting at the start of each call.
    pub additive: bool,
    /// Record `sentence → score` for every scored sentence.
    pub trace_sentences: bool,
}

/// Accumulator mutated only by the scorer that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringState {
    pub accumulated_score: f64,
    pub match_count: usize,
    pub seen_sentences: HashSet<String>,
    pub compound_terms: HashMap<String, f64>,
}

impl ScoringState {
    pub fn reset(&mut self) {
        *self = ScoringState::default();
    }
}

/// Result of one scoring pass, before it is folded into the state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CallOutcome {
    normalized: f64,
    matches: usize,
}

/// The lexicon scorer. See the module docs for the algorithm.
pub struct DictionaryScorer {
    lexicon: Arc<Lexicon>,
    parser: Box<dyn DependencyParser>,
    negation: NegationDetector,
    options: ScorerOptions,
    state: ScoringState,
    sentence_trace: HashMap<String, f64>,
    matcher: Option<(Vec<String>, TermMatcher)>,
    accumulated_terms: Option<Vec<String>>,
}

impl std::fmt::Debug for DictionaryScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryScorer")
            .field("lexicon_size", &self.lexicon.len())
            .field("options", &self.options)
            .field("state", &self.state)
            .finish()
    }
}

impl DictionaryScorer {
    pub fn new(lexicon: Arc<Lexicon>, parser: Box<dyn DependencyParser>, options: ScorerOptions) -> Self {
        Self {
            lexicon,
            parser,
            negation: NegationDetector::default(),
            options,
            state: ScoringState::default(),
            sentence_trace: HashMap::new(),
            matcher: None,
            accumulated_terms: None,
        }
    }

    /// Replaces the default German negation detector.
    pub fn with_negation(mut self, negation: NegationDetector) -> Self {
        self.negation = negation;
        self
    }

    pub fn options(&self) -> ScorerOptions {
        self.options
    }

    /// Switching modes does not clear the state; call [`DictionaryScorer::reset`] for that.
    pub fn set_additive(&mut self, additive: bool) {
        self.options.additive = additive;
    }

    pub fn state(&self) -> &ScoringState {
        &self.state
    }

    pub fn compound_terms(&self) -> &HashMap<String, f64> {
        &self.state.compound_terms
    }

    pub fn sentence_trace(&self) -> &HashMap<String, f64> {
        &self.sentence_trace
    }

    /// Clears the accumulator, the dedup set, the trace and the additive term binding.
    pub fn reset(&mut self) {
        self.state.reset();
        self.sentence_trace.clear();
        self.accumulated_terms = None;
    }

    /// Public entry point: returns `0.0` without parsing when no search term
    /// occurs in `text`, otherwise delegates to [`DictionaryScorer::predict_sentiment`].
    pub fn analyse_sentiment<S: AsRef<str>>(
        &mut self,
        text: &str,
        search_terms: &[S],
    ) -> Result<f64, SentilexError> {
        self.prepare_matcher(search_terms)?;
        if !self.text_mentions_term(text) {
            if !self.options.additive {
                self.reset();
            }
            return Ok(0.0);
        }
        self.predict_sentiment(text, search_terms)
    }

    /// Scores `text` and returns the (running, in additive mode) score.
    pub fn predict_sentiment<S: AsRef<str>>(
        &mut self,
        text: &str,
        search_terms: &[S],
    ) -> Result<f64, SentilexError> {
        self.run(text, search_terms)?;
        Ok(self.state.accumulated_score)
    }

    /// Like [`DictionaryScorer::predict_sentiment`], but `None` when no search
    /// term occurs in `text`. A term hit without lexicon words is `Some(0.0)`.
    pub fn score_detailed<S: AsRef<str>>(
        &mut self,
        text: &str,
        search_terms: &[S],
    ) -> Result<Option<f64>, SentilexError> {
        self.run(text, search_terms)?;
        if !self.text_mentions_term(text) {
            return Ok(None);
        }
        Ok(Some(self.state.accumulated_score))
    }

    fn run<S: AsRef<str>>(&mut self, text: &str, search_terms: &[S]) -> Result<CallOutcome, SentilexError> {
        let terms = self.prepare_matcher(search_terms)?;

        if self.options.additive {
            let changed = self
                .accumulated_terms
                .as_ref()
                .map_or(false, |bound| *bound != terms);
            if changed {
                return Err(SentilexError::InvalidArgument(
                    "search terms changed while accumulating; reset the scorer first".to_string(),
                ));
            }
            if self.accumulated_terms.is_none() {
                self.accumulated_terms = Some(terms);
            }
        } else {
            self.reset();
        }

        if !self.text_mentions_term(text) {
            return Ok(CallOutcome { normalized: 0.0, matches: 0 });
        }

        let outcome = self.score_sentences(text)?;
        self.state.accumulated_score += outcome.normalized;
        self.state.match_count += outcome.matches;
        Ok(outcome)
    }

    /// Validates terms and (re)builds the cached matcher. Returns the normalised terms.
    fn prepare_matcher<S: AsRef<str>>(&mut self, search_terms: &[S]) -> Result<Vec<String>, SentilexError> {
        let raw: Vec<String> = search_terms.iter().map(|s| s.as_ref().to_string()).collect();
        if let Some((cached_raw, matcher)) = &self.matcher {
            if *cached_raw == raw {
                return Ok(matcher.terms().to_vec());
            }
        }
        let matcher = TermMatcher::new(&raw)
            .map_err(|e| SentilexError::InvalidArgument(format!("search terms: {}", e)))?;
        let terms = matcher.terms().to_vec();
        self.matcher = Some((raw, matcher));
        Ok(terms)
    }

    fn text_mentions_term(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .map_or(false, |(_, matcher)| matcher.is_match(text))
    }

    fn score_sentences(&mut self, text: &str) -> Result<CallOutcome, SentilexError> {
        let Some((_, matcher)) = self.matcher.as_ref() else {
            return Ok(CallOutcome { normalized: 0.0, matches: 0 });
        };
        let sentences = self.parser.parse(text)?;

        let mut call_sum = 0.0;
        let mut call_matches = 0usize;

        for sentence in &sentences {
            if !matcher.is_match(&sentence.text) {
                continue;
            }
            if self.state.seen_sentences.contains(&sentence.text) {
                continue;
            }

            let mut sentence_score = 0.0;
            for (index, token) in sentence.tokens.iter().enumerate() {
                let lowered = token.text.to_lowercase();
                if matcher.is_match_lowercase(&lowered) {
                    *self.state.compound_terms.entry(token.text.clone()).or_insert(0.0) += 1.0;
                    continue;
                }
                if let Some(weight) = self.lexicon.weight(&lowered) {
                    sentence_score += weight * self.negation.sign_for(sentence, index);
                    call_matches += 1;
                }
            }

            self.state.seen_sentences.insert(sentence.text.clone());
            if self.options.trace_sentences {
                debug!("sentence score {:+.4}: {}", sentence_score, sentence.text);
                *self.sentence_trace.entry(sentence.text.clone()).or_insert(0.0) += sentence_score;
            }
            call_sum += sentence_score;
        }

        let normalized = if call_matches > 0 {
            clamp_polarity(call_sum / call_matches as f64)
        } else {
            0.0
        };
        Ok(CallOutcome {
            normalized,
            matches: call_matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconEntry;
    use crate::parse::heuristic::HeuristicParser;
    use crate::parse::CountingParser;

    fn lexicon() -> Arc<Lexicon> {
        Arc::new(Lexicon::from_entries([
            LexiconEntry { word: "gut".into(), weight: 1.0 },
            LexiconEntry { word: "schlecht".into(), weight: -1.0 },
            LexiconEntry { word: "angst".into(), weight: -0.5 },
        ]))
    }

    fn scorer(options: ScorerOptions) -> DictionaryScorer {
        DictionaryScorer::new(lexicon(), Box::new(HeuristicParser::new()), options)
    }

    const TERMS: &[&str] = &["flüchtlinge"];

    #[test]
    fn test_plain_negative_sentence() {
        let mut s = scorer(ScorerOptions::default());
        assert_eq!(s.analyse_sentiment("Flüchtlinge sind schlecht.", TERMS).unwrap(), -1.0);
    }

    #[test]
    fn test_root_negation_inverts() {
        let mut s = scorer(ScorerOptions::default());
        assert_eq!(s.analyse_sentiment("Flüchtlinge sind nicht schlecht.", TERMS).unwrap(), 1.0);
    }

    #[test]
    fn test_short_circuit_skips_parser() {
        let parser = Arc::new(CountingParser::new(HeuristicParser::new()));
        let mut s = DictionaryScorer::new(lexicon(), Box::new(parser.clone()), ScorerOptions::default());
        assert_eq!(s.analyse_sentiment("Das Wetter ist gut.", TERMS).unwrap(), 0.0);
        assert_eq!(s.predict_sentiment("Das Wetter ist gut.", TERMS).unwrap(), 0.0);
        assert_eq!(parser.calls(), 0);

        s.analyse_sentiment("Flüchtlinge sind gut.", TERMS).unwrap();
        assert_eq!(parser.calls(), 1);
    }

    #[test]
    fn test_no_lexicon_neighbours_is_zero_not_nan() {
        let mut s = scorer(ScorerOptions::default());
        let score = s.predict_sentiment("Flüchtlinge kommen an.", TERMS).unwrap();
        assert_eq!(score, 0.0);
        assert_eq!(s.score_detailed("Flüchtlinge kommen an.", TERMS).unwrap(), Some(0.0));
        assert_eq!(s.score_detailed("Das Wetter ist gut.", TERMS).unwrap(), None);
    }

    #[test]
    fn test_short_circuit_clears_previous_call() {
        let mut s = scorer(ScorerOptions { additive: false, trace_sentences: true });
        s.analyse_sentiment("Flüchtlinge sind gut.", TERMS).unwrap();
        assert_eq!(s.state().match_count, 1);

        assert_eq!(s.analyse_sentiment("Das Wetter ist gut.", TERMS).unwrap(), 0.0);
        assert_eq!(s.state().match_count, 0);
        assert_eq!(s.state().accumulated_score, 0.0);
        assert!(s.sentence_trace().is_empty());
        assert!(s.compound_terms().is_empty());
    }

    #[test]
    fn test_search_term_token_is_not_scored() {
        let lexicon = Arc::new(Lexicon::from_entries([
            LexiconEntry { word: "flüchtlinge".into(), weight: -1.0 },
            LexiconEntry { word: "gut".into(), weight: 0.5 },
        ]));
        let mut s = DictionaryScorer::new(lexicon, Box::new(HeuristicParser::new()), ScorerOptions::default());
        assert_eq!(s.analyse_sentiment("Flüchtlinge sind gut.", TERMS).unwrap(), 0.5);
        assert_eq!(s.compound_terms().get("Flüchtlinge"), Some(&1.0));
    }

    #[test]
    fn test_only_sentences_with_terms_are_scored() {
        let mut s = scorer(ScorerOptions::default());
        let text = "Das Essen ist schlecht. Flüchtlinge sind gut.";
        assert_eq!(s.analyse_sentiment(text, TERMS).unwrap(), 1.0);
    }

    #[test]
    fn test_normalization_by_match_count() {
        let mut s = scorer(ScorerOptions::default());
        // gut (+1) and schlecht (-1) and gut (+1): sum 1 over 3 matches
        let text = "Flüchtlinge sind gut. Flüchtlinge sind schlecht und gut.";
        let score = s.analyse_sentiment(text, TERMS).unwrap();
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent_in_default_mode() {
        let mut s = scorer(ScorerOptions::default());
        let a = s.analyse_sentiment("Flüchtlinge sind schlecht.", TERMS).unwrap();
        let b = s.analyse_sentiment("Flüchtlinge sind schlecht.", TERMS).unwrap();
        assert_eq!(a, b);
        assert_eq!(s.state().match_count, 1);
    }

    #[test]
    fn test_additive_mode_sums_independent_calls() {
        let mut independent = scorer(ScorerOptions::default());
        let a = independent.predict_sentiment("Flüchtlinge sind schlecht.", TERMS).unwrap();
        let b = independent.predict_sentiment("Flüchtlinge haben keine Angst.", TERMS).unwrap();

        let mut s = scorer(ScorerOptions { additive: true, trace_sentences: false });
        s.predict_sentiment("Flüchtlinge sind schlecht.", TERMS).unwrap();
        let total = s.predict_sentiment("Flüchtlinge haben keine Angst.", TERMS).unwrap();
        assert!((total - (a + b)).abs() < 1e-12);
        assert_eq!(s.state().match_count, 2);
    }

    #[test]
    fn test_additive_mode_deduplicates_sentences() {
        let mut s = scorer(ScorerOptions { additive: true, trace_sentences: false });
        s.predict_sentiment("Flüchtlinge sind gut.", TERMS).unwrap();
        let total = s.predict_sentiment("Flüchtlinge sind gut.", TERMS).unwrap();
        assert_eq!(total, 1.0);
        assert_eq!(s.state().seen_sentences.len(), 1);
    }

    #[test]
    fn test_additive_detailed_score_keeps_running_total() {
        let mut s = scorer(ScorerOptions { additive: true, trace_sentences: false });
        assert_eq!(s.score_detailed("Flüchtlinge sind gut.", TERMS).unwrap(), Some(1.0));
        // Repeated sentence adds nothing but the total stands.
        assert_eq!(s.score_detailed("Flüchtlinge sind gut.", TERMS).unwrap(), Some(1.0));
        assert_eq!(s.predict_sentiment("Flüchtlinge sind gut.", TERMS).unwrap(), 1.0);
        assert_eq!(s.score_detailed("Das Wetter ist gut.", TERMS).unwrap(), None);
    }

    #[test]
    fn test_additive_mode_rejects_changed_terms_until_reset() {
        let mut s = scorer(ScorerOptions { additive: true, trace_sentences: false });
        s.predict_sentiment("Flüchtlinge sind gut.", TERMS).unwrap();
        let err = s.predict_sentiment("Migranten sind gut.", &["migranten"]).unwrap_err();
        assert!(matches!(err, SentilexError::InvalidArgument(_)));

        s.reset();
        assert_eq!(s.predict_sentiment("Migranten sind gut.", &["migranten"]).unwrap(), 1.0);
    }

    #[test]
    fn test_trace_records_sentence_scores() {
        let mut s = scorer(ScorerOptions { additive: false, trace_sentences: true });
        s.analyse_sentiment("Flüchtlinge sind nicht schlecht. Flüchtlinge sind gut.", TERMS)
            .unwrap();
        assert_eq!(s.sentence_trace().get("Flüchtlinge sind nicht schlecht."), Some(&1.0));
        assert_eq!(s.sentence_trace().get("Flüchtlinge sind gut."), Some(&1.0));
    }

    #[test]
    fn test_invalid_search_terms() {
        let mut s = scorer(ScorerOptions::default());
        let empty: &[&str] = &[];
        assert!(matches!(
            s.analyse_sentiment("Flüchtlinge", empty),
            Err(SentilexError::InvalidArgument(_))
        ));
        assert!(matches!(
            s.analyse_sentiment("Flüchtlinge", &["flüchtlinge", " "]),
            Err(SentilexError::InvalidArgument(_))
        ));
    }
}
