use daachorse::DoubleArrayAhoCorasick;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Reasons a [`TermMatcher`] could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherError {
    /// No terms were supplied.
    Empty,
    /// A term was empty or whitespace only.
    BlankTerm(usize),
    /// The automaton rejected the pattern set.
    Build(String),
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherError::Empty => write!(f, "search term list is empty"),
            MatcherError::BlankTerm(idx) => write!(f, "search term #{} is blank", idx),
            MatcherError::Build(msg) => write!(f, "failed to build term automaton: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatcherError {}

/// Case-insensitive substring matcher over a fixed set of search terms.
///
/// Terms are lower-cased and de-duplicated on construction; haystacks are
/// lower-cased before scanning.
pub struct TermMatcher {
    automaton: DoubleArrayAhoCorasick<usize>,
    terms: Vec<String>,
}

impl fmt::Debug for TermMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermMatcher")
            .field("automaton", &"<DoubleArrayAhoCorasick>")
            .field("terms", &self.terms)
            .finish()
    }
}

impl TermMatcher {
    pub fn new<I, S>(terms: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for (idx, term) in terms.into_iter().enumerate() {
            let term = term.as_ref().trim();
            if term.is_empty() {
                return Err(MatcherError::BlankTerm(idx));
            }
            normalized.push(term.to_lowercase());
        }
        if normalized.is_empty() {
            return Err(MatcherError::Empty);
        }
        normalized.sort();
        normalized.dedup();

        let automaton = DoubleArrayAhoCorasick::new(normalized.iter().map(String::as_str))
            .map_err(|e| MatcherError::Build(e.to_string()))?;

        Ok(Self {
            automaton,
            terms: normalized,
        })
    }

    /// The normalised (lower-case, de-duplicated, sorted) terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether any term occurs in `text`, ignoring case.
    pub fn is_match(&self, text: &str) -> bool {
        self.is_match_lowercase(&text.to_lowercase())
    }

    /// Same as [`TermMatcher::is_match`] for a haystack that is already lower case.
    pub fn is_match_lowercase(&self, lowered: &str) -> bool {
        self.automaton.find_iter(lowered).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_matches_case_insensitively() {
        let matcher = TermMatcher::new(vec!["Flüchtling"]).unwrap();
        assert!(matcher.is_match("FLÜCHTLINGE kommen an."));
        assert!(matcher.is_match("die flüchtlingskrise"));
        assert!(!matcher.is_match("Migranten"));
    }

    #[test]
    fn test_duplicate_terms_are_collapsed() {
        let matcher = TermMatcher::new(vec!["asyl", "ASYL", "asyl"]).unwrap();
        assert_eq!(matcher.terms(), &["asyl".to_string()]);
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        let empty: Vec<&str> = Vec::new();
        assert_eq!(TermMatcher::new(empty).unwrap_err(), MatcherError::Empty);
        assert_eq!(
            TermMatcher::new(vec!["asyl", "  "]).unwrap_err(),
            MatcherError::BlankTerm(1)
        );
    }
}
