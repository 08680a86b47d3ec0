// sentilex/src/cli.rs
//! Command-line interface definition for `sentilex`.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use sentilex_core::Method;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "sentilex",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Keyword-scoped sentiment scoring for German news text",
    long_about = "Sentilex scores news articles for the sentiment expressed towards a set of search terms. It combines a negation-aware SentiWS lexicon scorer with optional neural polarity classifiers and evaluates all methods against a labeled validation set.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long = "config", value_name = "FILE", global = true, help = "Path to a YAML configuration file.")]
    pub config: Option<PathBuf>,

    /// Disable log output and summaries.
    #[arg(long, short = 'q', global = true, help = "Suppress all log output and summary tables.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scores an article corpus with the selected methods.
    #[command(about = "Scores a JSON article corpus with the selected methods.")]
    Score(ScoreCommand),

    /// Evaluates methods against a labeled validation set.
    #[command(about = "Evaluates scoring methods against a labeled TSV validation set.")]
    Evaluate(EvaluateCommand),

    /// Scores a single text with the lexicon method.
    #[command(about = "Scores a single text from a file or stdin with the lexicon method.")]
    Analyse(AnalyseCommand),
}

/// Options shared by the batch commands.
#[derive(Args, Debug, Clone, Default)]
pub struct MethodSelection {
    /// Methods to run (comma-separated). Defaults to the configured methods.
    #[arg(
        long = "method",
        short = 'm',
        value_delimiter = ',',
        value_name = "METHOD",
        help = "Methods to run: sentiws, generic_sentibert, finetuned_sentibert (comma-separated)."
    )]
    pub methods: Vec<Method>,

    /// Search terms that replace the configured ones (comma-separated).
    #[arg(long = "search-term", short = 's', value_delimiter = ',', value_name = "TERM", help = "Search terms that replace the configured ones (comma-separated).")]
    pub search_terms: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ScoreCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "JSON object of article records.")]
    pub input: PathBuf,

    #[arg(long, short = 'o', value_name = "FILE", help = "Where to write the scored articles (JSON).")]
    pub output: PathBuf,

    #[command(flatten)]
    pub selection: MethodSelection,

    /// Only score the first N articles.
    #[arg(long, value_name = "N", help = "Only score the first N articles (in key order).")]
    pub sample: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct EvaluateCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "Tab-separated validation set: text, integer label.")]
    pub input: PathBuf,

    #[arg(long, short = 'o', value_name = "FILE", help = "Write aggregated results as JSON to this file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub selection: MethodSelection,

    #[arg(long = "label-smoothing", value_name = "S", help = "Scale of the positive/negative targets, in (0, 1].")]
    pub label_smoothing: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct AnalyseCommand {
    /// Input file (reads stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the text from a file instead of stdin.")]
    pub input: Option<PathBuf>,

    #[arg(long = "search-term", short = 's', value_delimiter = ',', value_name = "TERM", help = "Search terms that replace the configured ones (comma-separated).")]
    pub search_terms: Vec<String>,

    /// Print the score of every matched sentence.
    #[arg(long, help = "Print the score of every sentence that mentions a search term.")]
    pub trace: bool,

    #[arg(long, help = "Print the result as JSON.")]
    pub json: bool,
}
