//! Neural polarity classifier adapter.
//!
//! The model itself is an external service behind [`PolarityModel`]: it
//! takes a batch of texts and returns class probabilities over
//! `{positive, negative, neutral}`. [`PolarityClassifier`] cleans the input
//! text and collapses the probabilities into a scalar
//! `P(positive) - P(negative)`; neutrality is implicit in the remainder.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sentilex_stats::scoring::clamp_polarity;
use std::time::Duration;

use crate::config::ModelEndpoint;
use crate::errors::SentilexError;

static CLEAN_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-züöäÖÜÄß ]").expect("character class is valid"));
static CLEAN_HTTP_URLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https*\S+").expect("url pattern is valid"));
static CLEAN_AT_MENTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\S+").expect("mention pattern is valid"));

const GERMAN_DIGITS: [&str; 10] = [
    " null", " eins", " zwei", " drei", " vier", " fünf", " sechs", " sieben", " acht", " neun",
];

/// Probabilities for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl ClassProbabilities {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self { positive, negative, neutral }
    }

    /// `P(positive) - P(negative)`, clamped onto `[-1, 1]`.
    pub fn polarity(&self) -> f64 {
        clamp_polarity(self.positive - self.negative)
    }
}

/// A batch classifier over `{positive, negative, neutral}`.
pub trait PolarityModel: Send + Sync {
    /// Identifier used in log lines.
    fn model_id(&self) -> &str;

    /// Must return exactly one entry per input text, in input order.
    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, SentilexError>;
}

impl<M: PolarityModel + ?Sized> PolarityModel for Box<M> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, SentilexError> {
        (**self).predict(texts)
    }
}

/// Normalises text the way the German sentiment models were trained.
pub fn clean_text(text: &str) -> String {
    let text = text.replace('\n', " ");
    let text = CLEAN_HTTP_URLS.replace_all(&text, "");
    let text = CLEAN_AT_MENTIONS.replace_all(&text, "");

    let mut spelled = String::with_capacity(text.len());
    for c in text.chars() {
        match c.to_digit(10) {
            Some(d) => spelled.push_str(GERMAN_DIGITS[d as usize]),
            None => spelled.push(c),
        }
    }

    let text = CLEAN_CHARS.replace_all(&spelled, "");
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Client for a text-classification inference server.
///
/// Sends `{"model": <id>, "inputs": [<text>, ...]}` and expects
/// `[[p_pos, p_neg, p_neutral], ...]` back.
#[derive(Debug)]
pub struct HttpPolarityModel {
    client: reqwest::blocking::Client,
    url: url::Url,
    model: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    model: &'a str,
    inputs: &'a [String],
}

impl HttpPolarityModel {
    pub fn from_endpoint(endpoint: &ModelEndpoint) -> Result<Self, SentilexError> {
        let url = url::Url::parse(&endpoint.url).map_err(|e| {
            SentilexError::InvalidArgument(format!("invalid classifier url '{}': {}", endpoint.url, e))
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| SentilexError::Classifier(format!("failed to build HTTP client: {}", e)))?;

        let api_token = match &endpoint.api_token_env {
            Some(var) => match std::env::var(var) {
                Ok(token) => Some(token),
                Err(_) => {
                    warn!("Classifier token variable '{}' is not set; sending unauthenticated requests.", var);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            client,
            url,
            model: endpoint.model.clone(),
            api_token,
        })
    }
}

impl PolarityModel for HttpPolarityModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, SentilexError> {
        let mut request = self.client.post(self.url.clone()).json(&PredictRequest {
            model: &self.model,
            inputs: texts,
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let rows: Vec<[f64; 3]> = request
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| SentilexError::Classifier(format!("{}: {}", self.model, e)))?;

        if rows.len() != texts.len() {
            return Err(SentilexError::Classifier(format!(
                "{}: expected {} predictions, received {}",
                self.model,
                texts.len(),
                rows.len()
            )));
        }
        rows.into_iter()
            .map(|[p, n, u]| {
                if [p, n, u].iter().all(|v| v.is_finite()) {
                    Ok(ClassProbabilities::new(p, n, u))
                } else {
                    Err(SentilexError::Classifier(format!("{}: non-finite probability", self.model)))
                }
            })
            .collect()
    }
}

/// Cleans text, calls the model and converts probabilities to polarity.
///
/// Batching only changes how many texts go into one request; each text's
/// polarity is the same whether it is scored alone or in a batch.
#[derive(Debug)]
pub struct PolarityClassifier<M> {
    model: M,
    batch_size: usize,
}

impl<M: PolarityModel> PolarityClassifier<M> {
    pub fn new(model: M, batch_size: usize) -> Self {
        Self {
            model,
            batch_size: batch_size.max(1),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn analyse_sentiment(&self, text: &str) -> Result<f64, SentilexError> {
        let mut polarities = self.analyse_batch(&[text.to_string()])?;
        polarities
            .pop()
            .ok_or_else(|| SentilexError::Classifier(format!("{}: empty response", self.model.model_id())))
    }

    pub fn analyse_batch(&self, texts: &[String]) -> Result<Vec<f64>, SentilexError> {
        let cleaned: Vec<String> = texts.iter().map(|t| clean_text(t)).collect();
        let mut polarities = Vec::with_capacity(cleaned.len());

        for chunk in cleaned.chunks(self.batch_size) {
            debug!("{}: scoring batch of {}", self.model.model_id(), chunk.len());
            let probabilities = self.model.predict(chunk)?;
            if probabilities.len() != chunk.len() {
                return Err(SentilexError::Classifier(format!(
                    "{}: expected {} predictions, received {}",
                    self.model.model_id(),
                    chunk.len(),
                    probabilities.len()
                )));
            }
            polarities.extend(probabilities.iter().map(ClassProbabilities::polarity));
        }
        Ok(polarities)
    }
}
