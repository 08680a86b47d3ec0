//! End-of-run summary tables for the batch commands.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;
use sentilex_core::{EnsembleReport, EvaluationReport, Method};
use std::collections::BTreeMap;
use std::io::{self, Write};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn heading<W: Write>(writer: &mut W, title: &str, color: bool) -> io::Result<()> {
    if color {
        writeln!(writer, "\n{}", title.bold().underline())
    } else {
        writeln!(writer, "\n{}", title)
    }
}

/// Prints scored/skipped counts and per-method coverage of a `score` run.
pub fn print_score_summary<W: Write>(
    writer: &mut W,
    report: &EnsembleReport,
    requested: &[Method],
    color: bool,
) -> io::Result<()> {
    let summary = report.summary();
    heading(writer, "Scoring Summary", color)?;
    writeln!(
        writer,
        "Articles: {} processed, {} scored, {} skipped",
        summary.processed, summary.scored, summary.skipped
    )?;
    if summary.duplicates > 0 {
        writeln!(
            writer,
            "Duplicate urls: {} article(s) replaced by a later one",
            summary.duplicates
        )?;
    }

    let mut table = new_table();
    table.set_header(vec!["Method", "With signal", "No signal (NaN)", "Errors", "Status"]);
    for &method in requested {
        let status = match report.method_failures.get(&method) {
            Some(reason) => format!("unavailable: {}", reason),
            None => "ok".to_string(),
        };
        let with_signal = summary.with_signal.get(&method).copied().unwrap_or(0);
        let errors = summary.item_errors.get(&method).copied().unwrap_or(0);
        let no_signal = if report.method_failures.contains_key(&method) {
            0
        } else {
            summary.scored.saturating_sub(with_signal + errors)
        };
        table.add_row(vec![
            method.to_string(),
            with_signal.to_string(),
            no_signal.to_string(),
            errors.to_string(),
            status,
        ]);
    }
    writeln!(writer, "{table}")?;

    if !report.skipped.is_empty() {
        let line = format!("Skipped {} article(s):", report.skipped.len());
        if color {
            writeln!(writer, "{}", line.yellow())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
        for skipped in &report.skipped {
            writeln!(writer, "  {}: {}", skipped.key, skipped.reason)?;
        }
    }
    Ok(())
}

/// Prints the aggregated metrics of an `evaluate` run.
pub fn print_evaluation_summary<W: Write>(
    writer: &mut W,
    report: &EvaluationReport,
    color: bool,
) -> io::Result<()> {
    heading(writer, "Evaluation Summary", color)?;
    writeln!(writer, "Validation examples: {}", report.total_examples)?;

    let mut table = new_table();
    table.set_header(vec![
        "Method",
        "Evaluated",
        "Skipped",
        "Mean abs. error",
        "Std abs. error",
        "Mean cat. error",
        "Std cat. error",
    ]);
    for (method, result) in &report.results {
        let skipped = report.skipped_examples.get(method).copied().unwrap_or(0);
        table.add_row(vec![
            method.to_string(),
            report.total_examples.saturating_sub(skipped).to_string(),
            skipped.to_string(),
            format!("{:.4}", result.mean_absolute_error),
            format!("{:.4}", result.std_absolute_error),
            format!("{:.4}", result.mean_categorical_error),
            format!("{:.4}", result.std_categorical_error),
        ]);
    }
    writeln!(writer, "{table}")?;
    print_failures(writer, &report.failures, color)
}

fn print_failures<W: Write>(writer: &mut W, failures: &BTreeMap<Method, String>, color: bool) -> io::Result<()> {
    for (method, reason) in failures {
        let line = format!("{} failed: {}", method, reason);
        if color {
            writeln!(writer, "{}", line.red())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}
