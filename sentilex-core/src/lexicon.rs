//! Word → polarity weight table.
//!
//! A `Lexicon` is loaded once and shared read-only (behind an `Arc`) by
//! every scorer. Two on-disk formats are understood:
//!
//! * **SentiWS**: `Word|POS<TAB>weight<TAB>inflection,inflection,...`. The
//!   base form and every inflection receive the same weight.
//! * **TSV**: `word<TAB>weight`.
//!
//! Keys are stored lower-cased; lookups lower-case the probe.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::SentilexError;

/// On-disk layout of a lexicon file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LexiconFormat {
    #[default]
    Sentiws,
    Tsv,
}

/// A single `(word, weight)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub word: String,
    pub weight: f64,
}

/// Immutable mapping from normalised word form to signed weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, f64>,
}

impl Lexicon {
    /// Builds a lexicon from in-memory entries. Later entries win on duplicate keys.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LexiconEntry>,
    {
        let mut weights = HashMap::new();
        for entry in entries {
            weights.insert(entry.word.to_lowercase(), entry.weight);
        }
        Self { weights }
    }

    /// Loads and merges one or more lexicon files of the same format.
    pub fn load_files<P: AsRef<Path>>(paths: &[P], format: LexiconFormat) -> Result<Self> {
        let mut lexicon = Lexicon::default();
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
            let entries = match format {
                LexiconFormat::Sentiws => parse_sentiws(&text),
                LexiconFormat::Tsv => parse_tsv(&text),
            }
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;

            let before = lexicon.len();
            for entry in entries {
                if lexicon.weights.insert(entry.word.clone(), entry.weight).is_some() {
                    debug!("Lexicon key '{}' redefined by {}", entry.word, path.display());
                }
            }
            info!(
                "Loaded {} lexicon keys from {}.",
                lexicon.len() - before,
                path.display()
            );
        }
        Ok(lexicon)
    }

    /// Weight for `word`, if the lexicon knows it.
    pub fn weight(&self, word: &str) -> Option<f64> {
        if let Some(w) = self.weights.get(word) {
            return Some(*w);
        }
        self.weights.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Parses SentiWS text into entries (base form plus inflections).
pub fn parse_sentiws(text: &str) -> Result<Vec<LexiconEntry>, SentilexError> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let mut columns = line.split('\t');
        let head = columns.next().unwrap_or_default();
        let weight_col = columns.next().ok_or_else(|| {
            SentilexError::Lexicon(format!("line {}: missing weight column", idx + 1))
        })?;
        let weight = parse_weight(weight_col, idx + 1)?;

        let base = head.split('|').next().unwrap_or_default().trim();
        if base.is_empty() {
            return Err(SentilexError::Lexicon(format!("line {}: empty word", idx + 1)));
        }
        entries.push(LexiconEntry { word: base.to_lowercase(), weight });

        if let Some(inflections) = columns.next() {
            for form in inflections.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                entries.push(LexiconEntry { word: form.to_lowercase(), weight });
            }
        }
    }
    Ok(entries)
}

/// Parses a plain `word<TAB>weight` table.
pub fn parse_tsv(text: &str) -> Result<Vec<LexiconEntry>, SentilexError> {
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let (word, weight) = line.split_once('\t').ok_or_else(|| {
            SentilexError::Lexicon(format!("line {}: expected 'word<TAB>weight'", idx + 1))
        })?;
        let word = word.trim();
        if word.is_empty() {
            return Err(SentilexError::Lexicon(format!("line {}: empty word", idx + 1)));
        }
        entries.push(LexiconEntry {
            word: word.to_lowercase(),
            weight: parse_weight(weight, idx + 1)?,
        });
    }
    Ok(entries)
}

fn parse_weight(raw: &str, line: usize) -> Result<f64, SentilexError> {
    let weight: f64 = raw.trim().parse().map_err(|_| {
        SentilexError::Lexicon(format!("line {}: invalid weight '{}'", line, raw.trim()))
    })?;
    if !weight.is_finite() {
        return Err(SentilexError::Lexicon(format!("line {}: non-finite weight", line)));
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_sentiws_expands_inflections() {
        let text = "Schlecht|ADJX\t-0.7706\tschlechte,schlechtem,schlechten\nGut|ADJX\t0.3716\tgute,guten\n";
        let lexicon = Lexicon::from_entries(parse_sentiws(text).unwrap());
        assert_eq!(lexicon.weight("schlecht"), Some(-0.7706));
        assert_eq!(lexicon.weight("schlechten"), Some(-0.7706));
        assert_eq!(lexicon.weight("Gute"), Some(0.3716));
        assert_eq!(lexicon.weight("mittel"), None);
    }

    #[test]
    fn test_parse_sentiws_rejects_bad_weight() {
        let err = parse_sentiws("Gut|ADJX\tviel\t\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_tsv() {
        let lexicon = Lexicon::from_entries(parse_tsv("gut\t1.0\nschlecht\t-1.0\n\n").unwrap());
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.weight("SCHLECHT"), Some(-1.0));
    }

    #[test]
    fn test_parse_tsv_missing_tab() {
        assert!(parse_tsv("gut 1.0").is_err());
    }

    #[test]
    fn test_load_files_merges_later_wins() -> Result<()> {
        let mut positive = NamedTempFile::new()?;
        writeln!(positive, "Gut|ADJX\t0.5\tgute")?;
        let mut negative = NamedTempFile::new()?;
        writeln!(negative, "Schlecht|ADJX\t-0.5\t")?;
        writeln!(negative, "Gut|ADJX\t0.9\t")?;

        let lexicon = Lexicon::load_files(&[positive.path(), negative.path()], LexiconFormat::Sentiws)?;
        assert_eq!(lexicon.weight("gut"), Some(0.9));
        assert_eq!(lexicon.weight("gute"), Some(0.5));
        assert_eq!(lexicon.weight("schlecht"), Some(-0.5));
        Ok(())
    }
}
