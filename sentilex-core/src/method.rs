// sentilex-core/src/method.rs
//! Scoring methods and the registry that maps each one to its scorer.
//!
//! The `SentimentMethod` trait is the pluggable seam between the batch
//! runners (ensemble, evaluation) and the concrete scorers. Each variant of
//! [`Method`] owns exactly one boxed implementation inside a
//! [`MethodRegistry`], so runners dispatch on the enum rather than on names.
//!
//! License: MIT OR Apache-2.0

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::classifier::{HttpPolarityModel, PolarityClassifier, PolarityModel};
use crate::config::{ModelEndpoint, ParserConfig, ParserKind, SentilexConfig};
use crate::dictionary::{DictionaryScorer, ScorerOptions};
use crate::errors::SentilexError;
use crate::lexicon::Lexicon;
use crate::parse::conllu::CommandParser;
use crate::parse::heuristic::HeuristicParser;
use crate::parse::DependencyParser;

/// The scoring methods known to the ensemble and the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Lexicon scorer over SentiWS weights.
    Sentiws,
    GenericSentibert,
    FinetunedSentibert,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Sentiws, Method::GenericSentibert, Method::FinetunedSentibert];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Sentiws => "sentiws",
            Method::GenericSentibert => "generic_sentibert",
            Method::FinetunedSentibert => "finetuned_sentibert",
        }
    }

    /// Name of the field the ensemble attaches to each article.
    pub fn field_name(&self) -> String {
        format!("sentiment_{}", self.name())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SentilexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| {
                SentilexError::InvalidArgument(format!(
                    "unknown method '{}'; expected one of sentiws, generic_sentibert, finetuned_sentibert",
                    s
                ))
            })
    }
}

/// A scorer that maps one text to a polarity in [-1, 1].
///
/// `Ok(None)` means the method had nothing to score; it is distinct from a
/// computed neutral `Ok(Some(0.0))`.
pub trait SentimentMethod: Send {
    fn score(&mut self, text: &str) -> Result<Option<f64>, SentilexError>;

    /// Scores many texts. Results are positional and per item.
    fn score_batch(&mut self, texts: &[String]) -> Vec<Result<Option<f64>, SentilexError>> {
        texts.iter().map(|t| self.score(t)).collect()
    }
}

/// The dictionary scorer bound to a fixed list of search terms.
#[derive(Debug)]
pub struct DictionaryMethod {
    scorer: DictionaryScorer,
    search_terms: Vec<String>,
}

impl DictionaryMethod {
    pub fn new(scorer: DictionaryScorer, search_terms: Vec<String>) -> Self {
        Self { scorer, search_terms }
    }

    pub fn scorer(&self) -> &DictionaryScorer {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut DictionaryScorer {
        &mut self.scorer
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }
}

impl SentimentMethod for DictionaryMethod {
    fn score(&mut self, text: &str) -> Result<Option<f64>, SentilexError> {
        self.scorer.score_detailed(text, &self.search_terms)
    }
}

impl<M: PolarityModel> SentimentMethod for PolarityClassifier<M> {
    fn score(&mut self, text: &str) -> Result<Option<f64>, SentilexError> {
        self.analyse_sentiment(text).map(Some)
    }

    fn score_batch(&mut self, texts: &[String]) -> Vec<Result<Option<f64>, SentilexError>> {
        match self.analyse_batch(texts) {
            Ok(polarities) => polarities.into_iter().map(|p| Ok(Some(p))).collect(),
            Err(e) => {
                let message = e.to_string();
                texts
                    .iter()
                    .map(|_| Err(SentilexError::Classifier(message.clone())))
                    .collect()
            }
        }
    }
}

/// Lookup table from method to scorer.
#[derive(Default)]
pub struct MethodRegistry {
    scorers: BTreeMap<Method, Box<dyn SentimentMethod>>,
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, scorer: Box<dyn SentimentMethod>) {
        self.scorers.insert(method, scorer);
    }

    pub fn contains(&self, method: Method) -> bool {
        self.scorers.contains_key(&method)
    }

    pub fn get_mut(&mut self, method: Method) -> Result<&mut (dyn SentimentMethod + 'static), SentilexError> {
        self.scorers
            .get_mut(&method)
            .map(|s| s.as_mut())
            .ok_or(SentilexError::MethodUnavailable(method))
    }

    /// Registered methods in stable order.
    pub fn methods(&self) -> Vec<Method> {
        self.scorers.keys().copied().collect()
    }
}

/// Builds the parser back-end named by the configuration.
pub fn build_parser(config: &ParserConfig) -> Result<Box<dyn DependencyParser>, SentilexError> {
    match config.kind {
        ParserKind::Heuristic => Ok(Box::new(HeuristicParser::new())),
        ParserKind::Command => Ok(Box::new(CommandParser::new(&config.command)?)),
    }
}

/// Builds a dictionary method from the configuration's lexicon, parser and terms.
pub fn build_dictionary_method(config: &SentilexConfig) -> Result<DictionaryMethod, SentilexError> {
    let lexicon = Lexicon::load_files(config.lexicon.paths.as_slice(), config.lexicon.format)?;
    let parser = build_parser(&config.parser)?;
    let options = ScorerOptions {
        additive: config.dictionary.additive,
        trace_sentences: config.dictionary.trace_sentences,
    };
    let scorer = DictionaryScorer::new(Arc::new(lexicon), parser, options);
    Ok(DictionaryMethod::new(scorer, config.normalized_search_terms()))
}

fn build_classifier(
    method: Method,
    endpoint: Option<&ModelEndpoint>,
) -> Result<Box<dyn SentimentMethod>, SentilexError> {
    let endpoint = endpoint.ok_or(SentilexError::MethodUnavailable(method))?;
    let model = HttpPolarityModel::from_endpoint(endpoint)?;
    Ok(Box::new(PolarityClassifier::new(model, endpoint.batch_size)))
}

/// Builds a scorer for every requested method.
///
/// A method that cannot be built (missing model endpoint, unreadable
/// lexicon) is reported in the returned failure map; the others still run.
pub fn build_registry(
    config: &SentilexConfig,
    methods: &[Method],
) -> (MethodRegistry, BTreeMap<Method, String>) {
    let mut registry = MethodRegistry::new();
    let mut failures = BTreeMap::new();

    for &method in methods {
        if registry.contains(method) || failures.contains_key(&method) {
            continue;
        }
        let built: Result<Box<dyn SentimentMethod>, SentilexError> = match method {
            Method::Sentiws => build_dictionary_method(config).map(|m| Box::new(m) as Box<dyn SentimentMethod>),
            Method::GenericSentibert => build_classifier(method, config.classifiers.generic.as_ref()),
            Method::FinetunedSentibert => build_classifier(method, config.classifiers.finetuned.as_ref()),
        };
        match built {
            Ok(scorer) => {
                info!("Method '{}' ready", method);
                registry.insert(method, scorer);
            }
            Err(e) => {
                warn!("Method '{}' unavailable: {}", method, e);
                failures.insert(method, e.to_string());
            }
        }
    }
    (registry, failures)
}
