// sentilex-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use sentilex_core::config::{self, ConfigOverlay, ParserKind, SentilexConfig};
use sentilex_core::{LexiconFormat, Method};

#[test]
fn test_load_default_config() {
    let config = SentilexConfig::load_default().unwrap();
    assert!(config.search_terms.iter().any(|t| t == "flüchtling"));
    assert_eq!(config.lexicon.format, LexiconFormat::Sentiws);
    assert_eq!(config.parser.kind, ParserKind::Heuristic);
}

#[test]
fn test_load_from_file_overrides_sections() -> Result<()> {
    let yaml_content = r#"
search_terms: [asylbewerber]
methods: [sentiws, generic_sentibert]
lexicon:
  format: tsv
  paths: [lexicon.tsv]
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = SentilexConfig::load_from_file(file.path())?;

    assert_eq!(config.search_terms, vec!["asylbewerber".to_string()]);
    assert_eq!(config.methods, vec![Method::Sentiws, Method::GenericSentibert]);
    assert_eq!(config.lexicon.format, LexiconFormat::Tsv);
    // Relative paths resolve next to the config file.
    let expected = file.path().parent().unwrap().join("lexicon.tsv");
    assert_eq!(config.lexicon.paths, vec![expected]);
    // Untouched sections keep their defaults.
    assert!(config.classifiers.generic.is_some());
    assert_eq!(config.evaluation.label_smoothing, 1.0);
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_values() -> Result<()> {
    let yaml_content = r#"
search_terms: []
evaluation:
  label_smoothing: 1.5
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = SentilexConfig::load_from_file(file.path()).unwrap_err().to_string();
    assert!(err.contains("search_terms"));
    assert!(err.contains("label_smoothing"));
    Ok(())
}

#[test]
fn test_load_from_file_rejects_unknown_keys() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"search_words: [asyl]\n")?;
    assert!(ConfigOverlay::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_discover_prefers_explicit_path() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"methods: [finetuned_sentibert]\n")?;
    let config = SentilexConfig::discover(Some(file.path()))?;
    assert_eq!(config.methods, vec![Method::FinetunedSentibert]);
    Ok(())
}

#[test]
fn test_candidate_paths_are_yaml_files() {
    for path in config::config_candidate_paths() {
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.yaml"));
    }
}
