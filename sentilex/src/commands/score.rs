//! `sentilex score`: enrich an article corpus with polarity fields.

use anyhow::Result;
use log::info;
use sentilex_core::{build_registry, load_articles, score_articles, write_scored, SentilexConfig};
use std::io;

use crate::cli::ScoreCommand;
use crate::commands::resolve_methods;
use crate::ui::output_format::{info_msg, stderr_supports_color, warn_msg};
use crate::ui::summary::print_score_summary;

pub fn run_score(cmd: &ScoreCommand, config: &SentilexConfig, quiet: bool) -> Result<()> {
    let methods = resolve_methods(&cmd.selection, config);
    info!("Running score with methods: {:?}", methods);

    let articles = load_articles(&cmd.input)?;
    let (mut registry, failures) = build_registry(config, &methods);
    if !quiet {
        for (method, reason) in &failures {
            warn_msg(format!("Method '{}' will be skipped: {}", method, reason));
        }
    }

    let mut report = score_articles(&articles, &methods, &mut registry, cmd.sample);
    // Build-time reasons are more precise than "not configured".
    report.method_failures.extend(failures);

    write_scored(&cmd.output, &report.scored)?;

    if !quiet {
        info_msg(format!("Wrote {} scored articles to {}", report.scored.len(), cmd.output.display()));
        print_score_summary(&mut io::stderr(), &report, &methods, stderr_supports_color())?;
    }
    Ok(())
}
