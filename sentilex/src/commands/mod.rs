// sentilex/src/commands/mod.rs
pub mod analyse;
pub mod evaluate;
pub mod score;

use anyhow::{Context, Result};
use sentilex_core::{Method, SentilexConfig};
use std::path::Path;

use crate::cli::MethodSelection;

/// Loads the configuration and applies command-line overrides.
pub fn load_config(explicit: Option<&Path>, search_terms: &[String]) -> Result<SentilexConfig> {
    let mut config = SentilexConfig::discover(explicit).context("Failed to load configuration")?;
    if !search_terms.is_empty() {
        config.search_terms = search_terms.to_vec();
    }
    config.validate()?;
    Ok(config)
}

/// Methods from the command line, else from the configuration.
pub fn resolve_methods(selection: &MethodSelection, config: &SentilexConfig) -> Vec<Method> {
    if selection.methods.is_empty() {
        config.methods.clone()
    } else {
        selection.methods.clone()
    }
}
