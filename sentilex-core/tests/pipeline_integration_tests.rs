// sentilex-core/tests/pipeline_integration_tests.rs
//! End-to-end runs over real files: SentiWS lexicon, article corpus, validation set.

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;
use test_log::test;

use sentilex_core::{
    build_registry, evaluate, load_articles, load_validation_set, score_articles, write_scored, CountingParser,
    DictionaryScorer, HeuristicParser, Lexicon, LexiconFormat, Method, ScorerOptions, SentilexConfig, SentilexError,
};

const SENTIWS_POSITIVE: &str = "Gut|ADJX\t0.3716\tgute,guten,guter,gutes,gutem,besser,beste\n";
const SENTIWS_NEGATIVE: &str = "Schlecht|ADJX\t-0.7706\tschlechte,schlechten,schlechter,schlechtes\n";

fn write_lexicon(dir: &TempDir) -> Vec<std::path::PathBuf> {
    let pos = dir.path().join("SentiWS_Positive.txt");
    let neg = dir.path().join("SentiWS_Negative.txt");
    std::fs::write(&pos, SENTIWS_POSITIVE).unwrap();
    std::fs::write(&neg, SENTIWS_NEGATIVE).unwrap();
    vec![pos, neg]
}

fn config(dir: &TempDir) -> SentilexConfig {
    let mut config = SentilexConfig::load_default().unwrap();
    config.lexicon.format = LexiconFormat::Sentiws;
    config.lexicon.paths = write_lexicon(dir);
    config.search_terms = vec!["flüchtlinge".to_string()];
    config.classifiers.generic = None;
    config.classifiers.finetuned = None;
    config
}

#[test]
fn test_sentiws_lexicon_drives_scorer() -> Result<()> {
    let dir = TempDir::new()?;
    let lexicon = Lexicon::load_files(&write_lexicon(&dir), LexiconFormat::Sentiws)?;
    assert_eq!(lexicon.weight("schlechten"), Some(-0.7706));

    let parser = Arc::new(CountingParser::new(HeuristicParser::new()));
    let mut scorer = DictionaryScorer::new(Arc::new(lexicon), Box::new(parser.clone()), ScorerOptions::default());
    let terms = ["flüchtlinge"];

    assert_eq!(scorer.analyse_sentiment("Die Lage ist schlecht.", &terms)?, 0.0);
    assert_eq!(parser.calls(), 0);

    let score = scorer.analyse_sentiment("Flüchtlinge haben keine guten Chancen.", &terms)?;
    assert!((score + 0.3716).abs() < 1e-12);
    assert_eq!(parser.calls(), 1);
    Ok(())
}

#[test]
fn test_score_articles_from_files() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let input = dir.path().join("articles.json");
    std::fs::write(
        &input,
        r#"{
            "1": {"url": "https://www.welt.de/a", "date": "2015-09-01", "title": "A",
                  "text": "Flüchtlinge sind schlecht. Die Bahn ist gut."},
            "2": {"url": "https://taz.de/b", "date": "2015-09-02", "title": "B",
                  "text": "Flüchtlinge kommen an."},
            "3": {"url": "https://www.zeit.de/c", "title": "C", "text": "Flüchtlinge."},
            "4": {"url": "https://www.faz.net/d", "date": "2015-09-04", "title": "D",
                  "text": "Das Wetter ist gut."}
        }"#,
    )?;

    let articles = load_articles(&input)?;
    let methods = [Method::Sentiws, Method::GenericSentibert];
    let (mut registry, failures) = build_registry(&config, &methods);
    assert!(failures.contains_key(&Method::GenericSentibert));

    let report = score_articles(&articles, &methods, &mut registry, None);
    assert_eq!(report.scored.len(), 3);
    assert_eq!(report.skipped.len(), 1);

    let output = dir.path().join("scored.json");
    write_scored(&output, &report.scored)?;
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["https://www.welt.de/a"]["publisher"], "welt");
    assert_eq!(written["https://www.welt.de/a"]["sentiment_sentiws"], -0.7706);
    assert_eq!(written["https://taz.de/b"]["sentiment_sentiws"], 0.0);
    assert!(written["https://www.faz.net/d"]["sentiment_sentiws"].is_null());
    assert!(written["https://taz.de/b"].get("sentiment_generic_sentibert").is_none());
    Ok(())
}

#[test]
fn test_evaluate_from_validation_file() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);
    let input = dir.path().join("validation.tsv");
    std::fs::write(
        &input,
        "Flüchtlinge sind schlecht.\t1\nFlüchtlinge kommen an.\t2\nFlüchtlinge sind schlecht.\t3\n",
    )?;

    let examples = load_validation_set(&input)?;
    let (mut registry, _) = build_registry(&config, &[Method::Sentiws]);
    let report = evaluate(&examples, &[Method::Sentiws], &mut registry, 1.0)?;
    let result = report.results[&Method::Sentiws];

    // -0.7706 against -1, 0.0 against 0, -0.7706 against -1.
    let expected = (2.0 * (1.0 - 0.7706)) / 3.0;
    assert!((result.mean_absolute_error - expected).abs() < 1e-9);
    assert_eq!(result.mean_categorical_error, 0.0);
    Ok(())
}

#[test]
fn test_malformed_validation_file_aborts() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("validation.tsv");
    std::fs::write(&input, "ok\t0\nkaputt\n")?;
    match load_validation_set(&input) {
        Err(SentilexError::MalformedInput { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedInput, got {:?}", other),
    }
    Ok(())
}
