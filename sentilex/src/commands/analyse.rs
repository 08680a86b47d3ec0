//! `sentilex analyse`: lexicon score of one text.

use anyhow::{Context, Result};
use sentilex_core::{headless_analyse, AnalysisOutcome, SentilexConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use crate::cli::AnalyseCommand;

#[derive(Debug, Serialize)]
struct AnalyseJson<'a> {
    /// `null` when no lexicon word was found near a search term.
    polarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentences: Option<&'a BTreeMap<String, f64>>,
}

fn read_input(cmd: &AnalyseCommand) -> Result<String> {
    match &cmd.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

pub fn run_analyse(cmd: &AnalyseCommand, config: &SentilexConfig) -> Result<()> {
    let text = read_input(cmd)?;
    let outcome = headless_analyse(config, &text)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_outcome(&mut writer, &outcome, cmd.trace, cmd.json)
}

fn write_outcome<W: Write>(writer: &mut W, outcome: &AnalysisOutcome, trace: bool, json: bool) -> Result<()> {
    if json {
        let payload = AnalyseJson {
            polarity: outcome.polarity,
            sentences: trace.then_some(&outcome.sentences),
        };
        serde_json::to_writer_pretty(&mut *writer, &payload)?;
        writeln!(writer)?;
        return Ok(());
    }

    match outcome.polarity {
        Some(polarity) => writeln!(writer, "{:.4}", polarity)?,
        None => writeln!(writer, "{:.4} (no search term in text)", 0.0)?,
    }
    if trace {
        for (sentence, score) in &outcome.sentences {
            writeln!(writer, "{:+.4}\t{}", score, sentence)?;
        }
    }
    Ok(())
}
