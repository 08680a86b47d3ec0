//! `sentilex evaluate`: error metrics of each method on a validation set.

use anyhow::{Context, Result};
use sentilex_core::{build_registry, evaluate, load_validation_set, write_report, SentilexConfig};
use std::io::{self, Write};

use crate::cli::EvaluateCommand;
use crate::commands::resolve_methods;
use crate::ui::output_format::stderr_supports_color;
use crate::ui::summary::print_evaluation_summary;

pub fn run_evaluate(cmd: &EvaluateCommand, config: &SentilexConfig, quiet: bool) -> Result<()> {
    let methods = resolve_methods(&cmd.selection, config);
    let label_smoothing = cmd.label_smoothing.unwrap_or(config.evaluation.label_smoothing);

    let examples = load_validation_set(&cmd.input)
        .with_context(|| format!("Invalid validation set {}", cmd.input.display()))?;
    let (mut registry, build_failures) = build_registry(config, &methods);

    let mut report = evaluate(&examples, &methods, &mut registry, label_smoothing)?;
    report.failures.extend(build_failures);

    match &cmd.output {
        Some(path) => write_report(path, &report)?,
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &report.results)?;
            writeln!(writer)?;
        }
    }

    if !quiet {
        print_evaluation_summary(&mut io::stderr(), &report, stderr_supports_color())?;
    }
    Ok(())
}
