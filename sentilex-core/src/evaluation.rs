//! Evaluation harness: compares scoring methods against a labeled validation set.
//!
//! Each example yields an absolute error against the (smoothed) target
//! polarity and a categorical miss flag against the ±1/3 bands. Both are
//! aggregated per method into mean and population standard deviation.
//!
//! A structurally broken validation file aborts the run. A method that is
//! unavailable, or fails on single examples, does not affect the others.
//!
//! License: MIT OR Apache-2.0

use anyhow::Context;
use log::{info, warn};
use sentilex_stats::scoring::{absolute_error, categorical_error, TargetClass};
use sentilex_stats::statistics::{compute_flag_stats, compute_stats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::errors::SentilexError;
use crate::method::{Method, MethodRegistry};

/// Annotated class of a validation example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
    /// Scored as negative; the classifiers were trained without a fourth class.
    Hostile,
}

impl Label {
    /// Integer codes used in the validation file.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Label::Positive),
            1 => Some(Label::Negative),
            2 => Some(Label::Neutral),
            3 => Some(Label::Hostile),
            _ => None,
        }
    }

    pub fn target_class(self) -> TargetClass {
        match self {
            Label::Positive => TargetClass::Positive,
            Label::Negative | Label::Hostile => TargetClass::Negative,
            Label::Neutral => TargetClass::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    pub text: String,
    pub label: Label,
}

/// Aggregated errors of one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub mean_absolute_error: f64,
    pub std_absolute_error: f64,
    pub mean_categorical_error: f64,
    pub std_categorical_error: f64,
}

impl EvaluationResult {
    pub fn from_errors(absolute_errors: &[f64], categorical_errors: &[bool]) -> Self {
        let absolute = compute_stats(absolute_errors);
        let categorical = compute_flag_stats(categorical_errors);
        Self {
            mean_absolute_error: absolute.mean,
            std_absolute_error: absolute.std_dev,
            mean_categorical_error: categorical.mean,
            std_categorical_error: categorical.std_dev,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    pub results: BTreeMap<Method, EvaluationResult>,
    /// Methods that produced no result, with the reason.
    pub failures: BTreeMap<Method, String>,
    /// Examples left out of a method's aggregate because scoring failed.
    pub skipped_examples: BTreeMap<Method, usize>,
    /// Size of the validation set.
    pub total_examples: usize,
}

/// Reads tab-separated `text<TAB>label` rows.
pub fn load_validation_set<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledExample>, SentilexError> {
    let path = path.as_ref();
    info!("Loading validation set from: {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open validation file {}", path.display()))?;
    let examples = parse_validation_set(file)?;
    info!("Loaded {} labeled examples.", examples.len());
    Ok(examples)
}

/// Parses validation rows from any reader. Any row that is not exactly two
/// columns with a known integer label is a `MalformedInput` error.
pub fn parse_validation_set<R: Read>(reader: R) -> Result<Vec<LabeledExample>, SentilexError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut examples = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| SentilexError::MalformedInput {
            line: e.position().map(|p| p.line() as usize).unwrap_or(index + 1),
            reason: e.to_string(),
        })?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(index + 1);

        if row.len() != 2 {
            return Err(SentilexError::MalformedInput {
                line,
                reason: format!("expected 2 tab-separated columns, found {}", row.len()),
            });
        }
        let raw_label = row[1].trim();
        let label = raw_label
            .parse::<i64>()
            .ok()
            .and_then(Label::from_code)
            .ok_or_else(|| SentilexError::MalformedInput {
                line,
                reason: format!("invalid label '{}'", raw_label),
            })?;
        examples.push(LabeledExample {
            text: row[0].to_string(),
            label,
        });
    }
    Ok(examples)
}

/// Runs every method in `methods` over `examples`.
///
/// A dictionary result of "nothing to score" counts as a neutral 0.0 here.
pub fn evaluate(
    examples: &[LabeledExample],
    methods: &[Method],
    registry: &mut MethodRegistry,
    label_smoothing: f64,
) -> Result<EvaluationReport, SentilexError> {
    if !(label_smoothing > 0.0 && label_smoothing <= 1.0) {
        return Err(SentilexError::InvalidArgument(format!(
            "label smoothing must lie in (0, 1], got {}",
            label_smoothing
        )));
    }

    let mut report = EvaluationReport {
        total_examples: examples.len(),
        ..EvaluationReport::default()
    };
    let texts: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();

    let mut requested = methods.to_vec();
    requested.sort();
    requested.dedup();

    for method in requested {
        let scorer = match registry.get_mut(method) {
            Ok(scorer) => scorer,
            Err(e) => {
                warn!("Skipping evaluation of '{}': {}", method, e);
                report.failures.insert(method, e.to_string());
                continue;
            }
        };

        info!("Evaluating '{}' on {} examples.", method, examples.len());
        let predictions = scorer.score_batch(&texts);

        let mut absolute_errors = Vec::with_capacity(examples.len());
        let mut categorical_errors = Vec::with_capacity(examples.len());
        let mut first_error = None;
        let mut skipped = 0;

        for (example, prediction) in examples.iter().zip(predictions) {
            let polarity = match prediction {
                Ok(value) => value.unwrap_or(0.0),
                Err(e) => {
                    warn!("'{}' failed on an example: {}", method, e);
                    skipped += 1;
                    first_error.get_or_insert_with(|| e.to_string());
                    continue;
                }
            };
            let class = example.label.target_class();
            absolute_errors.push(absolute_error(polarity, class, label_smoothing));
            categorical_errors.push(categorical_error(polarity, class));
        }

        if skipped > 0 {
            report.skipped_examples.insert(method, skipped);
        }
        if absolute_errors.is_empty() && !examples.is_empty() {
            let reason = first_error.unwrap_or_else(|| "no example could be scored".to_string());
            report.failures.insert(method, reason);
            continue;
        }
        report
            .results
            .insert(method, EvaluationResult::from_errors(&absolute_errors, &categorical_errors));
    }
    Ok(report)
}

/// Writes `method → EvaluationResult` as pretty JSON.
pub fn write_report<P: AsRef<Path>>(path: P, report: &EvaluationReport) -> anyhow::Result<()> {
    let path = path.as_ref();
    info!("Writing evaluation results to {}", path.display());
    let file = File::create(path)
        .with_context(|| format!("Failed to create results file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report.results)
        .with_context(|| format!("Failed to write results file {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
