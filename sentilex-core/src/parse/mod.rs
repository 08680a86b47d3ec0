//! Dependency-parse data model and the parser seam.
//!
//! Tokenisation and dependency parsing are external services. The scorer
//! only sees [`ParsedSentence`]s: ordered tokens where each token may point
//! at the index of its governing token. Back-ends:
//!
//! * [`heuristic::HeuristicParser`]: a dependency-free German approximation.
//! * [`conllu::CommandParser`]: pipes text through an external parser that
//!   speaks CoNLL-U (UDPipe, spaCy wrappers, Stanza, ...).
//!
//! License: MIT OR Apache-2.0

pub mod conllu;
pub mod heuristic;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::SentilexError;

/// A single token with its dependency link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Index of the governing token inside the same sentence; `None` for a root.
    pub head: Option<usize>,
}

impl Token {
    pub fn new(text: impl Into<String>, head: Option<usize>) -> Self {
        Self {
            text: text.into(),
            head,
        }
    }
}

/// An ordered token sequence with dependency links. Never mutated by scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl ParsedSentence {
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }

    /// Indices of every token without a governor.
    pub fn roots(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.head.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Tokens directly governed by the token at `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(move |t| t.head == Some(index))
    }

    /// The governor of the token at `index`, if any.
    pub fn governor(&self, index: usize) -> Option<&Token> {
        self.tokens
            .get(index)
            .and_then(|t| t.head)
            .and_then(|h| self.tokens.get(h))
    }
}

/// Splits raw text into dependency-parsed sentences.
pub trait DependencyParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError>;
}

impl<P: DependencyParser + ?Sized> DependencyParser for Box<P> {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
        (**self).parse(text)
    }
}

impl<P: DependencyParser + ?Sized> DependencyParser for Arc<P> {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
        (**self).parse(text)
    }
}

/// Wraps a parser and counts how often it is invoked.
#[derive(Debug)]
pub struct CountingParser<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingParser<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: DependencyParser> DependencyParser for CountingParser<P> {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(text)
    }
}
