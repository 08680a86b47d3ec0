//! CoNLL-U reader and the external-process parser back-end.
//!
//! Only the `ID`, `FORM` and `HEAD` columns are consumed. Comment lines,
//! multi-word token ranges (`3-4`) and empty nodes (`5.1`) are skipped. A
//! `# text = ...` comment, when present, becomes the sentence text.

use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

use super::{DependencyParser, ParsedSentence, Token};
use crate::errors::SentilexError;

const CONLLU_COLUMNS: usize = 10;

/// Parses a CoNLL-U document into sentences.
pub fn parse_conllu(input: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
    let mut sentences = Vec::new();
    let mut builder = SentenceBuilder::default();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if let Some(sentence) = builder.finish()? {
                sentences.push(sentence);
            }
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(text) = comment.trim_start().strip_prefix("text =") {
                builder.text = Some(text.trim().to_string());
            }
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != CONLLU_COLUMNS {
            return Err(SentilexError::Parser(format!(
                "line {}: expected {} columns, found {}",
                line_no,
                CONLLU_COLUMNS,
                columns.len()
            )));
        }
        let id = columns[0];
        if id.contains('-') || id.contains('.') {
            continue;
        }
        let id: usize = id
            .parse()
            .map_err(|_| SentilexError::Parser(format!("line {}: invalid token id '{}'", line_no, id)))?;
        if id != builder.tokens.len() + 1 {
            return Err(SentilexError::Parser(format!(
                "line {}: token id {} out of sequence",
                line_no, id
            )));
        }
        let head: usize = columns[6].parse().map_err(|_| {
            SentilexError::Parser(format!("line {}: invalid head '{}'", line_no, columns[6]))
        })?;
        builder.heads.push((head, line_no));
        builder.tokens.push(columns[1].to_string());
    }

    if let Some(sentence) = builder.finish()? {
        sentences.push(sentence);
    }
    Ok(sentences)
}

#[derive(Default)]
struct SentenceBuilder {
    text: Option<String>,
    tokens: Vec<String>,
    heads: Vec<(usize, usize)>,
}

impl SentenceBuilder {
    fn finish(&mut self) -> Result<Option<ParsedSentence>, SentilexError> {
        let forms = std::mem::take(&mut self.tokens);
        let heads = std::mem::take(&mut self.heads);
        let text = self.text.take();
        if forms.is_empty() {
            return Ok(None);
        }

        let count = forms.len();
        let mut tokens = Vec::with_capacity(count);
        for (form, (head, line_no)) in forms.iter().zip(heads) {
            let head = match head {
                0 => None,
                h if h <= count => Some(h - 1),
                h => {
                    return Err(SentilexError::Parser(format!(
                        "line {}: head {} beyond sentence length {}",
                        line_no, h, count
                    )))
                }
            };
            tokens.push(Token::new(form.clone(), head));
        }

        let text = text.unwrap_or_else(|| forms.join(" "));
        Ok(Some(ParsedSentence::new(text, tokens)))
    }
}

/// Runs an external parser that reads raw text on stdin and writes CoNLL-U on stdout.
#[derive(Debug, Clone)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    /// `command[0]` is the program, the rest are its arguments.
    pub fn new(command: &[String]) -> Result<Self, SentilexError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            SentilexError::InvalidArgument("parser command must not be empty".to_string())
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl DependencyParser for CommandParser {
    fn parse(&self, text: &str) -> Result<Vec<ParsedSentence>, SentilexError> {
        debug!("Spawning parser command '{}' for {} bytes", self.program, text.len());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SentilexError::Parser(format!("failed to start '{}': {}", self.program, e)))?;

        // Feed stdin from a separate thread so a chatty child cannot deadlock on a full pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SentilexError::Parser("parser stdin unavailable".to_string()))?;
        let payload = text.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(payload.as_bytes()));

        let output = child.wait_with_output()?;
        writer
            .join()
            .map_err(|_| SentilexError::Parser("stdin writer panicked".to_string()))??;

        if !output.status.success() {
            return Err(SentilexError::Parser(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| SentilexError::Parser(format!("parser output is not UTF-8: {}", e)))?;
        parse_conllu(&stdout)
    }
}
