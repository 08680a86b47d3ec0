// sentilex-core/src/lib.rs
//! # Sentilex Core Library
//!
//! `sentilex-core` scores the polarity of German news text towards a set of
//! search terms and compares scoring methods against labeled data.
//!
//! ## Modules
//!
//! * `lexicon`: Loads SentiWS or TSV word weights into an immutable [`Lexicon`].
//! * `parse`: The dependency parse model, the [`DependencyParser`] trait and its back-ends.
//! * `negation`: Sentence- and token-level negation signs.
//! * `dictionary`: The keyword-scoped lexicon scorer, [`DictionaryScorer`].
//! * `classifier`: Text cleaning and the [`PolarityModel`] adapters for neural classifiers.
//! * `method`: The [`Method`] enum, the [`SentimentMethod`] trait and the [`MethodRegistry`].
//! * `ensemble`: Scores an article corpus with every requested method.
//! * `evaluation`: Error metrics of each method on a validation set.
//! * `records`: Article record input and scored output.
//! * `config`: YAML configuration with embedded defaults.
//! * `headless`: One-shot helpers for a single text.
//! * `errors`: The [`SentilexError`] type.
//!
//! ## Usage Example
//!
//! ```rust
//! use sentilex_core::{DictionaryScorer, HeuristicParser, Lexicon, LexiconEntry, ScorerOptions};
//! use std::sync::Arc;
//!
//! let lexicon = Lexicon::from_entries([
//!     LexiconEntry { word: "gut".into(), weight: 1.0 },
//!     LexiconEntry { word: "schlecht".into(), weight: -1.0 },
//! ]);
//! let mut scorer = DictionaryScorer::new(
//!     Arc::new(lexicon),
//!     Box::new(HeuristicParser::new()),
//!     ScorerOptions::default(),
//! );
//!
//! let terms = ["flüchtlinge"];
//! assert_eq!(scorer.analyse_sentiment("Flüchtlinge sind schlecht.", &terms).unwrap(), -1.0);
//! assert_eq!(scorer.analyse_sentiment("Flüchtlinge sind nicht schlecht.", &terms).unwrap(), 1.0);
//! ```
//!
//! License: MIT OR Apache-2.0

pub mod classifier;
pub mod config;
pub mod dictionary;
pub mod ensemble;
pub mod errors;
pub mod evaluation;
pub mod headless;
pub mod lexicon;
pub mod method;
pub mod negation;
pub mod parse;
pub mod records;

pub use classifier::{clean_text, ClassProbabilities, HttpPolarityModel, PolarityClassifier, PolarityModel};
pub use config::{merge_config, ConfigOverlay, ModelEndpoint, SentilexConfig};
pub use dictionary::{DictionaryScorer, ScorerOptions, ScoringState};
pub use ensemble::{score_articles, EnsembleReport, EnsembleSummary, SkippedArticle};
pub use errors::SentilexError;
pub use evaluation::{
    evaluate, load_validation_set, write_report, EvaluationReport, EvaluationResult, Label, LabeledExample,
};
pub use headless::{headless_analyse, AnalysisOutcome};
pub use lexicon::{Lexicon, LexiconEntry, LexiconFormat};
pub use method::{build_registry, DictionaryMethod, Method, MethodRegistry, SentimentMethod};
pub use negation::{GermanSuffixStemmer, NegationDetector, Stemmer};
pub use parse::conllu::{parse_conllu, CommandParser};
pub use parse::heuristic::HeuristicParser;
pub use parse::{CountingParser, DependencyParser, ParsedSentence, Token};
pub use records::{load_articles, publisher_from_url, write_scored, ArticleRecord, ScoredArticle, ScoredCorpus};
