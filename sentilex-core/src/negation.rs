//! Syntactic negation detection.
//!
//! A token's sign is the product of two independent flips:
//!
//! 1. **Sentence level**: the root's direct dependents contain a negation
//!    marker. A sentence with more than one root is treated as un-negated.
//! 2. **Token level**: the token's own direct dependents contain a marker.
//!
//! Both flips together cancel out.

use crate::parse::ParsedSentence;

/// Closed set of German negation markers, in stemmed form.
pub const NEGATION_MARKERS: &[&str] = &[
    "nicht",
    "kein",
    "nirgends",
    "nirgendwo",
    "niemand",
    "niemals",
    "nirgendwohin",
    "nie",
];

/// Reduces a word to a language-specific stem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Light German inflection stripper.
///
/// Lower-cases the word and removes one of `em`, `en`, `er`, `es`, `e`, `s`
/// when at least three characters remain.
#[derive(Debug, Default, Clone, Copy)]
pub struct GermanSuffixStemmer;

const GERMAN_SUFFIXES: &[&str] = &["em", "en", "er", "es", "e", "s"];
const MIN_STEM_CHARS: usize = 3;

impl Stemmer for GermanSuffixStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        for suffix in GERMAN_SUFFIXES {
            if let Some(stem) = lowered.strip_suffix(suffix) {
                if stem.chars().count() >= MIN_STEM_CHARS {
                    return stem.to_string();
                }
            }
        }
        lowered
    }
}

/// Computes the ±1 multiplier for a token inside a parsed sentence.
pub struct NegationDetector {
    stemmer: Box<dyn Stemmer>,
    markers: Vec<String>,
}

impl std::fmt::Debug for NegationDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegationDetector")
            .field("markers", &self.markers)
            .finish()
    }
}

impl Default for NegationDetector {
    fn default() -> Self {
        Self::new(Box::new(GermanSuffixStemmer))
    }
}

impl NegationDetector {
    pub fn new(stemmer: Box<dyn Stemmer>) -> Self {
        // Markers are compared raw and stemmed, so "niemals" survives a stemmer that clips it.
        let mut markers: Vec<String> = NEGATION_MARKERS
            .iter()
            .flat_map(|m| [m.to_string(), stemmer.stem(m)])
            .collect();
        markers.sort();
        markers.dedup();
        Self { stemmer, markers }
    }

    /// Whether `word` is a negation marker after stemming.
    pub fn is_marker(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        if self.markers.iter().any(|m| *m == lowered) {
            return true;
        }
        let stem = self.stemmer.stem(word);
        self.markers.iter().any(|m| *m == stem)
    }

    fn governs_marker(&self, sentence: &ParsedSentence, index: usize) -> bool {
        sentence.children(index).any(|child| self.is_marker(&child.text))
    }

    /// `-1` when the whole sentence is negated through its root, else `+1`.
    pub fn sentence_sign(&self, sentence: &ParsedSentence) -> f64 {
        match sentence.roots().as_slice() {
            [root] if self.governs_marker(sentence, *root) => -1.0,
            _ => 1.0,
        }
    }

    /// `-1` when the token at `index` directly governs a marker, else `+1`.
    pub fn token_sign(&self, sentence: &ParsedSentence, index: usize) -> f64 {
        if self.governs_marker(sentence, index) {
            -1.0
        } else {
            1.0
        }
    }

    /// Combined multiplier for the token at `index`.
    pub fn sign_for(&self, sentence: &ParsedSentence, index: usize) -> f64 {
        self.sentence_sign(sentence) * self.token_sign(sentence, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Token;

    fn sentence(tokens: &[(&str, Option<usize>)]) -> ParsedSentence {
        let text = tokens.iter().map(|(t, _)| *t).collect::<Vec<_>>().join(" ");
        ParsedSentence::new(
            text,
            tokens.iter().map(|(t, h)| Token::new(*t, *h)).collect(),
        )
    }

    #[test]
    fn test_stemmer_folds_inflections() {
        let stemmer = GermanSuffixStemmer;
        assert_eq!(stemmer.stem("keine"), "kein");
        assert_eq!(stemmer.stem("keinen"), "kein");
        assert_eq!(stemmer.stem("Keines"), "kein");
        assert_eq!(stemmer.stem("nie"), "nie");
        assert_eq!(stemmer.stem("nicht"), "nicht");
    }

    #[test]
    fn test_markers_recognised() {
        let detector = NegationDetector::default();
        for word in ["nicht", "Nicht", "keinem", "niemals", "nirgendwohin", "nie"] {
            assert!(detector.is_marker(word), "{word} should be a marker");
        }
        assert!(!detector.is_marker("schlecht"));
        assert!(!detector.is_marker("nichts_anderes"));
    }

    #[test]
    fn test_plain_sentence_is_positive() {
        let s = sentence(&[("Flüchtlinge", Some(1)), ("sind", None), ("schlecht", Some(1))]);
        assert_eq!(NegationDetector::default().sign_for(&s, 2), 1.0);
    }

    #[test]
    fn test_root_negation_flips_every_token() {
        let s = sentence(&[
            ("Flüchtlinge", Some(1)),
            ("sind", None),
            ("nicht", Some(1)),
            ("schlecht", Some(1)),
        ]);
        let detector = NegationDetector::default();
        assert_eq!(detector.sign_for(&s, 3), -1.0);
        assert_eq!(detector.sign_for(&s, 0), -1.0);
    }

    #[test]
    fn test_token_negation_only_flips_that_token() {
        let s = sentence(&[
            ("Ich", Some(1)),
            ("habe", None),
            ("keine", Some(3)),
            ("Angst", Some(1)),
        ]);
        let detector = NegationDetector::default();
        assert_eq!(detector.sign_for(&s, 3), -1.0);
        assert_eq!(detector.sign_for(&s, 0), 1.0);
    }

    #[test]
    fn test_double_negation_cancels() {
        let s = sentence(&[
            ("Das", Some(1)),
            ("ist", None),
            ("nicht", Some(1)),
            ("kein", Some(4)),
            ("Problem", Some(1)),
        ]);
        assert_eq!(NegationDetector::default().sign_for(&s, 4), 1.0);
    }

    #[test]
    fn test_multiple_roots_disable_sentence_negation() {
        let s = sentence(&[
            ("gut", None),
            ("nicht", Some(0)),
            ("schlecht", None),
        ]);
        let detector = NegationDetector::default();
        assert_eq!(detector.sentence_sign(&s), 1.0);
        // token-level negation still applies
        assert_eq!(detector.sign_for(&s, 0), -1.0);
        assert_eq!(detector.sign_for(&s, 2), 1.0);
    }
}
