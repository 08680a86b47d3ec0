//! Configuration management for `sentilex-core`.
//!
//! Defines the YAML configuration model, the embedded defaults, and the
//! overlay merge used when a user file only changes a few sections.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lexicon::LexiconFormat;
use crate::method::Method;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SentilexConfig {
    /// Keywords that scope which sentences the dictionary method scores.
    pub search_terms: Vec<String>,
    /// Methods run by `score` and `evaluate` when none are given explicitly.
    pub methods: Vec<Method>,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub classifiers: ClassifierConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub additive: bool,
    pub trace_sentences: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub format: LexiconFormat,
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Heuristic,
    Command,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    pub kind: ParserKind,
    /// Program and arguments for `kind: command`.
    pub command: Vec<String>,
}

/// Location and batching of one classification model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelEndpoint {
    pub url: String,
    pub model: String,
    /// Name of the environment variable holding a bearer token.
    pub api_token_env: Option<String>,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl Default for ModelEndpoint {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/predict".to_string(),
            model: "oliverguhr/german-sentiment-bert".to_string(),
            api_token_env: None,
            batch_size: 16,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub generic: Option<ModelEndpoint>,
    pub finetuned: Option<ModelEndpoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Scales the ±1 targets of positive/negative labels; must lie in (0, 1].
    pub label_smoothing: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { label_smoothing: 1.0 }
    }
}

/// A partial configuration: every present top-level key replaces the default.
/// `classifiers` is merged per model slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub search_terms: Option<Vec<String>>,
    pub methods: Option<Vec<Method>>,
    pub dictionary: Option<DictionaryConfig>,
    pub lexicon: Option<LexiconConfig>,
    pub parser: Option<ParserConfig>,
    pub classifiers: Option<ClassifierOverlay>,
    pub evaluation: Option<EvaluationConfig>,
}

/// Per-slot classifier override. An absent key keeps the default; an
/// explicit `null` disables the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierOverlay {
    #[serde(default, with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub generic: Option<Option<ModelEndpoint>>,
    #[serde(default, with = "::serde_with::rust::double_option", skip_serializing_if = "Option::is_none")]
    pub finetuned: Option<Option<ModelEndpoint>>,
}

impl ConfigOverlay {
    /// Reads an overlay from YAML. Relative lexicon paths are resolved against the file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut overlay: ConfigOverlay = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let (Some(lexicon), Some(base)) = (overlay.lexicon.as_mut(), path.parent()) {
            for p in lexicon.paths.iter_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(overlay)
    }
}

impl SentilexConfig {
    /// Loads the built-in defaults.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: SentilexConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;
        Ok(config)
    }

    /// Loads a user file on top of the defaults and validates the result.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let overlay = ConfigOverlay::load_from_file(path)?;
        let config = merge_config(Self::load_default()?, Some(overlay));
        config.validate()?;
        Ok(config)
    }

    /// Uses `explicit` if given, else the first existing candidate path, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        for candidate in config_candidate_paths() {
            if candidate.is_file() {
                return Self::load_from_file(&candidate);
            }
        }
        debug!("No configuration file found; using built-in defaults.");
        let config = Self::load_default()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every constraint and reports all violations together.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.search_terms.is_empty() {
            errors.push("`search_terms` must not be empty.".to_string());
        }
        if self.search_terms.iter().any(|t| t.trim().is_empty()) {
            errors.push("`search_terms` contains a blank entry.".to_string());
        }
        let smoothing = self.evaluation.label_smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            errors.push(format!(
                "`evaluation.label_smoothing` must lie in (0, 1], got {}.",
                smoothing
            ));
        }
        if self.parser.kind == ParserKind::Command && self.parser.command.is_empty() {
            errors.push("`parser.command` is required when `parser.kind` is `command`.".to_string());
        }
        for (slot, endpoint) in [
            ("generic", &self.classifiers.generic),
            ("finetuned", &self.classifiers.finetuned),
        ] {
            if let Some(endpoint) = endpoint {
                if endpoint.batch_size == 0 {
                    errors.push(format!("`classifiers.{}.batch_size` must be at least 1.", slot));
                }
                if endpoint.model.trim().is_empty() {
                    errors.push(format!("`classifiers.{}.model` must not be empty.", slot));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }

    /// Search terms as used for matching: trimmed and lower-cased.
    pub fn normalized_search_terms(&self) -> Vec<String> {
        self.search_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect()
    }
}

/// Applies `overlay` on top of `default`.
pub fn merge_config(default: SentilexConfig, overlay: Option<ConfigOverlay>) -> SentilexConfig {
    let Some(overlay) = overlay else {
        return default;
    };
    let mut merged = default;

    if let Some(terms) = overlay.search_terms {
        debug!("Overriding search terms with {} user terms", terms.len());
        merged.search_terms = terms;
    }
    if let Some(methods) = overlay.methods {
        merged.methods = methods;
    }
    if let Some(dictionary) = overlay.dictionary {
        merged.dictionary = dictionary;
    }
    if let Some(lexicon) = overlay.lexicon {
        debug!("Overriding lexicon with {} user paths", lexicon.paths.len());
        merged.lexicon = lexicon;
    }
    if let Some(parser) = overlay.parser {
        merged.parser = parser;
    }
    if let Some(classifiers) = overlay.classifiers {
        if let Some(generic) = classifiers.generic {
            merged.classifiers.generic = generic;
        }
        if let Some(finetuned) = classifiers.finetuned {
            merged.classifiers.finetuned = finetuned;
        }
    }
    if let Some(evaluation) = overlay.evaluation {
        merged.evaluation = evaluation;
    }
    merged
}

/// Locations searched for a user configuration, most specific first.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("sentilex").join("config.yaml")),
        dirs::home_dir().map(|p| p.join(".sentilex").join("config.yaml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}
