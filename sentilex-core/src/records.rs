//! Article records: reading the scraped corpus and writing scored output.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use url::Url;

use crate::errors::SentilexError;

/// One article as produced by the scraper. Every field is optional on input;
/// unknown fields are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The fields the ensemble needs, borrowed from a record that has them all.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredFields<'a> {
    pub url: &'a str,
    pub publisher: String,
    pub date: &'a serde_json::Value,
    pub title: &'a str,
    pub text: &'a str,
}

impl ArticleRecord {
    /// Extracts `text`, `url`, `date` and `title`, deriving the publisher from the url.
    /// `key` names the record in the error.
    pub fn required_fields(&self, key: &str) -> Result<RequiredFields<'_>, SentilexError> {
        let missing = |field: &'static str| SentilexError::MissingField {
            record: key.to_string(),
            field,
        };
        let text = self.text.as_deref().ok_or_else(|| missing("text"))?;
        let url = self.url.as_deref().ok_or_else(|| missing("url"))?;
        let date = self
            .date
            .as_ref()
            .filter(|d| !d.is_null())
            .ok_or_else(|| missing("date"))?;
        let title = self.title.as_deref().ok_or_else(|| missing("title"))?;
        let publisher = publisher_from_url(url).ok_or_else(|| missing("url"))?;
        Ok(RequiredFields {
            url,
            publisher,
            date,
            title,
            text,
        })
    }
}

/// `https://www.spiegel.de/x` → `spiegel`, `https://taz.de/x` → `taz`.
pub fn publisher_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let label = match labels.len() {
        0 => return None,
        1 | 2 => labels[0],
        _ => labels[1],
    };
    Some(label.to_lowercase())
}

/// An article with the ensemble's score fields attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub publisher: String,
    pub date: serde_json::Value,
    pub title: String,
    pub text: String,
    /// `sentiment_<method>` → polarity. NaN means the method had nothing to
    /// score; `serde_json` writes it as `null`.
    #[serde(flatten)]
    pub scores: BTreeMap<String, f64>,
    /// Input fields the ensemble does not use, written back unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Output keys owned by the ensemble; an input field of the same name is dropped.
pub fn is_reserved_field(name: &str) -> bool {
    matches!(name, "publisher" | "date" | "title" | "text" | "url") || name.starts_with("sentiment_")
}

/// Scored output keyed by article url.
pub type ScoredCorpus = BTreeMap<String, ScoredArticle>;

/// Reads a JSON object of article records keyed by id.
pub fn load_articles<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, ArticleRecord>> {
    let path = path.as_ref();
    info!("Loading articles from: {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open article file {}", path.display()))?;
    let articles: BTreeMap<String, ArticleRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse article file {}", path.display()))?;
    debug!("Read {} article records.", articles.len());
    Ok(articles)
}

/// Writes the scored corpus as pretty JSON.
pub fn write_scored<P: AsRef<Path>>(path: P, corpus: &ScoredCorpus) -> Result<()> {
    let path = path.as_ref();
    info!("Writing {} scored articles to {}", corpus.len(), path.display());
    let file = File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, corpus)
        .with_context(|| format!("Failed to write output file {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
