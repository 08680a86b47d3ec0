//! Ensemble runner: scores every usable article with every requested method.
//!
//! Articles lacking a required field are skipped and reported. A method
//! that is unavailable, or that fails on one article, never aborts the run.
//!
//! License: MIT OR Apache-2.0

use log::{info, warn};
use std::collections::BTreeMap;

use crate::method::{Method, MethodRegistry};
use crate::records::{is_reserved_field, ArticleRecord, ScoredArticle, ScoredCorpus};

/// An article left out of the output, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArticle {
    pub key: String,
    pub reason: String,
}

/// Everything a `score_articles` run produced.
#[derive(Debug, Default)]
pub struct EnsembleReport {
    pub scored: ScoredCorpus,
    pub skipped: Vec<SkippedArticle>,
    /// Requested methods that could not run at all.
    pub method_failures: BTreeMap<Method, String>,
    /// Per-method count of articles where scoring raised an error.
    pub item_errors: BTreeMap<Method, usize>,
    /// Keys of articles replaced by a later article with the same url.
    pub duplicates: Vec<String>,
}

/// Counts for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsembleSummary {
    pub processed: usize,
    pub scored: usize,
    pub skipped: usize,
    pub duplicates: usize,
    /// Articles with a numeric (non-NaN) score, per method.
    pub with_signal: BTreeMap<Method, usize>,
    pub item_errors: BTreeMap<Method, usize>,
    pub unavailable: Vec<Method>,
}

impl EnsembleReport {
    pub fn summary(&self) -> EnsembleSummary {
        let mut with_signal = BTreeMap::new();
        for article in self.scored.values() {
            for method in Method::ALL {
                if let Some(value) = article.scores.get(&method.field_name()) {
                    let count = with_signal.entry(method).or_insert(0);
                    if !value.is_nan() {
                        *count += 1;
                    }
                }
            }
        }
        EnsembleSummary {
            processed: self.scored.len() + self.skipped.len() + self.duplicates.len(),
            scored: self.scored.len(),
            skipped: self.skipped.len(),
            duplicates: self.duplicates.len(),
            with_signal,
            item_errors: self.item_errors.clone(),
            unavailable: self.method_failures.keys().copied().collect(),
        }
    }
}

/// Scores `articles` with each method in `methods`.
///
/// `sample` keeps only the first N articles in key order. A method's
/// "nothing to score" result (no search term in the text) is attached as NaN.
/// Articles are keyed by url; a later article replaces an earlier one with
/// the same url and the earlier key is listed in `duplicates`.
pub fn score_articles(
    articles: &BTreeMap<String, ArticleRecord>,
    methods: &[Method],
    registry: &mut MethodRegistry,
    sample: Option<usize>,
) -> EnsembleReport {
    let mut report = EnsembleReport::default();

    let mut requested: Vec<Method> = methods.to_vec();
    requested.sort();
    requested.dedup();
    let runnable: Vec<Method> = requested
        .into_iter()
        .filter(|&method| {
            if registry.contains(method) {
                true
            } else {
                warn!("Method '{}' is not available; its field will be omitted.", method);
                report
                    .method_failures
                    .insert(method, format!("Scoring method '{}' is not configured", method));
                false
            }
        })
        .collect();

    let mut key_for_url: BTreeMap<String, String> = BTreeMap::new();
    let limit = sample.unwrap_or(usize::MAX);
    info!(
        "Scoring {} of {} articles with {} method(s).",
        articles.len().min(limit),
        articles.len(),
        runnable.len()
    );

    for (key, record) in articles.iter().take(limit) {
        let fields = match record.required_fields(key) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Skipping article '{}': {}", key, e);
                report.skipped.push(SkippedArticle {
                    key: key.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let mut scores = BTreeMap::new();
        for &method in &runnable {
            let outcome = registry.get_mut(method).and_then(|scorer| scorer.score(fields.text));
            match outcome {
                Ok(value) => {
                    scores.insert(method.field_name(), value.unwrap_or(f64::NAN));
                }
                Err(e) => {
                    warn!("Method '{}' failed on article '{}': {}", method, key, e);
                    *report.item_errors.entry(method).or_insert(0) += 1;
                }
            }
        }

        let extra = record
            .extra
            .iter()
            .filter(|(name, _)| !is_reserved_field(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if let Some(earlier) = key_for_url.insert(fields.url.to_string(), key.clone()) {
            warn!("Duplicate url {}; article '{}' replaces '{}'.", fields.url, key, earlier);
            report.duplicates.push(earlier);
        }
        report.scored.insert(
            fields.url.to_string(),
            ScoredArticle {
                publisher: fields.publisher,
                date: fields.date.clone(),
                title: fields.title.to_string(),
                text: fields.text.to_string(),
                scores,
                extra,
            },
        );
    }

    info!(
        "Scored {} articles, skipped {}.",
        report.scored.len(),
        report.skipped.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::CueModel;
    use crate::classifier::PolarityClassifier;
    use crate::dictionary::{DictionaryScorer, ScorerOptions};
    use crate::errors::SentilexError;
    use crate::lexicon::{Lexicon, LexiconEntry};
    use crate::method::{DictionaryMethod, SentimentMethod};
    use crate::parse::heuristic::HeuristicParser;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> MethodRegistry {
        let lexicon = Lexicon::from_entries([
            LexiconEntry { word: "gut".into(), weight: 1.0 },
            LexiconEntry { word: "schlecht".into(), weight: -1.0 },
        ]);
        let scorer = DictionaryScorer::new(
            Arc::new(lexicon),
            Box::new(HeuristicParser::new()),
            ScorerOptions::default(),
        );
        let mut registry = MethodRegistry::new();
        registry.insert(
            Method::Sentiws,
            Box::new(DictionaryMethod::new(scorer, vec!["flüchtlinge".to_string()])),
        );
        registry.insert(
            Method::GenericSentibert,
            Box::new(PolarityClassifier::new(CueModel::default(), 8)),
        );
        registry
    }

    fn articles() -> BTreeMap<String, ArticleRecord> {
        let raw = json!({
            "a": {"url": "https://www.spiegel.de/1", "date": "2015-09-01", "title": "A",
                  "text": "Flüchtlinge sind schlecht."},
            "b": {"url": "https://taz.de/2", "date": "2015-09-02", "title": "B",
                  "text": "Das Wetter ist gut."},
            "c": {"url": "https://www.zeit.de/3", "date": "2015-09-03",
                  "text": "Kein Titel."}
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_scores_and_skips() {
        let mut registry = registry();
        let report = score_articles(
            &articles(),
            &[Method::Sentiws, Method::GenericSentibert],
            &mut registry,
            None,
        );

        assert_eq!(report.scored.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "c");

        let spiegel = &report.scored["https://www.spiegel.de/1"];
        assert_eq!(spiegel.publisher, "spiegel");
        assert_eq!(spiegel.scores["sentiment_sentiws"], -1.0);

        let taz = &report.scored["https://taz.de/2"];
        assert_eq!(taz.publisher, "taz");
        assert!(taz.scores["sentiment_sentiws"].is_nan());
        assert!(taz.scores["sentiment_generic_sentibert"] > 0.0);

        let summary = report.summary();
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.with_signal[&Method::Sentiws], 1);
        assert_eq!(summary.with_signal[&Method::GenericSentibert], 2);
    }

    #[test]
    fn test_unavailable_method_does_not_abort() {
        let mut registry = registry();
        let report = score_articles(
            &articles(),
            &[Method::Sentiws, Method::FinetunedSentibert],
            &mut registry,
            None,
        );
        assert_eq!(report.scored.len(), 2);
        assert!(report.method_failures.contains_key(&Method::FinetunedSentibert));
        assert!(report
            .scored
            .values()
            .all(|a| !a.scores.contains_key("sentiment_finetuned_sentibert")));
    }

    #[test]
    fn test_sample_takes_first_articles() {
        let mut registry = registry();
        let report = score_articles(&articles(), &[Method::Sentiws], &mut registry, Some(1));
        assert_eq!(report.scored.len(), 1);
        assert!(report.scored.contains_key("https://www.spiegel.de/1"));
    }

    #[test]
    fn test_term_without_lexicon_words_scores_zero() {
        let mut registry = registry();
        let articles: BTreeMap<String, ArticleRecord> = serde_json::from_value(json!({
            "a": {"url": "https://taz.de/1", "date": "2015-09-01", "title": "A",
                  "text": "Flüchtlinge kommen an."}
        }))
        .unwrap();
        let report = score_articles(&articles, &[Method::Sentiws], &mut registry, None);
        let value = report.scored["https://taz.de/1"].scores["sentiment_sentiws"];
        assert_eq!(value, 0.0);
        assert_eq!(report.summary().with_signal[&Method::Sentiws], 1);
    }

    #[test]
    fn test_duplicate_urls_are_counted_and_extra_fields_kept() {
        let mut registry = registry();
        let articles: BTreeMap<String, ArticleRecord> = serde_json::from_value(json!({
            "a": {"url": "https://taz.de/1", "date": "2015-09-01", "title": "A",
                  "text": "Flüchtlinge sind schlecht.", "author": "jd"},
            "b": {"url": "https://taz.de/1", "date": "2015-09-02", "title": "B",
                  "text": "Flüchtlinge sind gut.", "author": "mk",
                  "sentiment_sentiws": 0.25}
        }))
        .unwrap();
        let report = score_articles(&articles, &[Method::Sentiws], &mut registry, None);

        assert_eq!(report.duplicates, vec!["a".to_string()]);
        let summary = report.summary();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.scored, 1);
        assert_eq!(summary.duplicates, 1);

        let kept = &report.scored["https://taz.de/1"];
        assert_eq!(kept.title, "B");
        assert_eq!(kept.extra.get("author"), Some(&json!("mk")));
        assert!(!kept.extra.contains_key("sentiment_sentiws"));
        assert_eq!(kept.scores["sentiment_sentiws"], 1.0);
    }

    struct FailingMethod;

    impl SentimentMethod for FailingMethod {
        fn score(&mut self, _text: &str) -> Result<Option<f64>, SentilexError> {
            Err(SentilexError::Classifier("model offline".to_string()))
        }
    }

    #[test]
    fn test_per_article_method_error_is_counted() {
        let mut registry = registry();
        registry.insert(Method::FinetunedSentibert, Box::new(FailingMethod));
        let report = score_articles(
            &articles(),
            &[Method::Sentiws, Method::FinetunedSentibert],
            &mut registry,
            None,
        );
        assert_eq!(report.scored.len(), 2);
        assert_eq!(report.item_errors[&Method::FinetunedSentibert], 2);
        assert_eq!(report.summary().item_errors[&Method::FinetunedSentibert], 2);
    }
}
