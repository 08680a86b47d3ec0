// sentilex/src/main.rs
//! Sentilex entry point.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use sentilex::cli::{Cli, Commands};
use sentilex::commands::{self, analyse, evaluate, score};
use sentilex::logger;
use sentilex::ui::output_format::{print_error_message, stderr_supports_color};

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Score(cmd) => {
            let config = commands::load_config(cli.config.as_deref(), &cmd.selection.search_terms)?;
            score::run_score(cmd, &config, cli.quiet)
        }
        Commands::Evaluate(cmd) => {
            let config = commands::load_config(cli.config.as_deref(), &cmd.selection.search_terms)?;
            evaluate::run_evaluate(cmd, &config, cli.quiet)
        }
        Commands::Analyse(cmd) => {
            let config = commands::load_config(cli.config.as_deref(), &cmd.search_terms)?;
            analyse::run_analyse(cmd, &config)
        }
    }
}

fn main() -> ExitCode {
    // Classifier tokens may live in a local .env file.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = print_error_message(&mut std::io::stderr(), &format!("{:#}", e), stderr_supports_color());
            ExitCode::FAILURE
        }
    }
}
