//! A dependency-free approximation of a German dependency parse.
//!
//! Sentences end at `.`, `!` or `?` followed by whitespace or end of input.
//! Within a sentence the first finite verb from a closed list becomes the
//! root (falling back to the first word). Negating determiners (`kein*`)
//! attach to the following word; everything else attaches to the root,
//! which is where particles like `nicht` or `nie` hang in a real parse.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{DependencyParser, ParsedSentence, Token};
use crate::errors::SentilexError;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:[-'’]\w+)*|[^\w\s]").expect("token pattern is valid")
});

static FINITE_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bin", "bist", "ist", "sind", "seid", "war", "warst", "waren", "wart", "sei", "wäre",
        "wären", "habe", "hast", "hat", "haben", "habt", "hatte", "hatten", "hätte", "hätten",
        "werde", "wirst", "wird", "werden", "werdet", "wurde", "wurden", "würde", "würden",
        "kann", "kannst", "können", "könnt", "konnte", "konnten", "könnte", "könnten", "muss",
        "musst", "müssen", "müsst", "musste", "mussten", "müsste", "soll", "sollst", "sollen",
        "sollt", "sollte", "sollten", "will", "willst", "wollen", "wollt", "wollte", "wollten",
        "darf", "darfst", "dürfen", "durfte", "durften", "mag", "magst", "mögen", "möchte",
        "möchten", "gibt", "gab", "gaben", "nehmen", "nimmt", "nahm", "nahmen", "kommen",
        "kommt", "kam", "kamen", "schaffen", "schafft", "bleibt", "bleiben", "blieb", "macht",
        "machen", "brauchen", "braucht", "fliehen", "flieht", "leben", "lebt", "arbeiten",
        "arbeitet", "helfen", "hilft", "bringen", "bringt", "gehen", "geht", "stehen", "steht",
    ]
    .into_iter()
    .collect()
});

/// Rule-based sentence splitter and shallow dependency attacher.
#[derive(Debug, Default, Clone)]
pub struct HeuristicParser;

impl HeuristicParser {
    pub fn new() -> Self {
        Self
    }

    fn split_sentences(text: &str) -> Vec<&str> {
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            // Swallow runs like "?!" or "...".
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '“' | '”' | '»' | '«' | ')') {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if at_boundary {
                let candidate = text[start..end].trim();
                if !candidate.is_empty() {
                    sentences.push(candidate);
                }
                start = end;
            }
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }

    fn attach(sentence: &str) -> ParsedSentence {
        let words: Vec<&str> = TOKEN_RE.find_iter(sentence).map(|m| m.as_str()).collect();
        let is_word = |w: &str| w.chars().next().map_or(false, char::is_alphanumeric);

        let root = words
            .iter()
            .position(|w| FINITE_VERBS.contains(w.to_lowercase().as_str()))
            .or_else(|| words.iter().position(|w| is_word(w)))
            .unwrap_or(0);

        let tokens = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if i == root {
                    return Token::new(*word, None);
                }
                let lowered = word.to_lowercase();
                let head = if lowered.starts_with("kein") {
                    match words.get(i + 1) {
                        Some(next) if is_word(next) && i + 1 != root => i + 1,
                        _ => root,
                    }
                } else {
                    root
                };
                Token::new(*word, Some(head))
            })
            .collect();

        ParsedSentence::new(sentence, tokens)
    }
}

impl DependencyParser for HeuristicParser {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
        Ok(Self::split_sentences(text)
            .into_iter()
            .map(Self::attach)
            .filter(|s| !s.tokens.is_empty())
            .collect())
    }
}
