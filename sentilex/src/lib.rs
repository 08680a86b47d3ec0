// sentilex/src/lib.rs
//! # Sentilex CLI
//!
//! Command-line front end for `sentilex-core`: corpus scoring, method
//! evaluation and single-text analysis.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
