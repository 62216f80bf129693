//! Line scanner and symbol substitution.
//!
//! A script line is split into tokens:
//!
//! | Token | Examples |
//! |-------|----------|
//! | identifier | `x`, `_tmp`, `slide2` |
//! | number | `10`, `0.5`, `.5`, `1e3`, `0x1f` |
//! | string | `"Hello"`, `` `raw` ``, `'c'` (delimiters kept) |
//! | punctuation | any other single character: `=`, `[`, `+`, `-` |
//!
//! Whitespace separates tokens; `//` and `/* … */` comments are dropped.
//! A sign is never part of a number, so `-5` scans as `-`, `5`.
//!
//! After scanning, every token except the first is replaced by its value in
//! the [`VarStore`] when it names an assigned variable.

use std::sync::OnceLock;

use regex::Regex;

use crate::var::VarStore;

// ── Record ────────────────────────────────────────────────────────────────────

/// One scanned, substituted directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number the directive came from.
    pub line: usize,
    /// Keyword (or assignment target) followed by the arguments.
    pub tokens: Vec<String>,
    /// The raw source line.
    pub text: String,
}

impl Record {
    pub fn new(line: usize, tokens: Vec<String>, text: impl Into<String>) -> Self {
        Self { line, tokens, text: text.into() }
    }

    /// The first token, or `""` for an empty record.
    pub fn keyword(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// Token `i`, or `""` past the end.
    pub fn arg(&self, i: usize) -> &str {
        self.tokens.get(i).map(String::as_str).unwrap_or("")
    }

    /// Tokens from position `i` on.
    pub fn rest(&self, i: usize) -> &[String] {
        self.tokens.get(i..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ── Scanning ──────────────────────────────────────────────────────────────────

fn token_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(
            r#"(?x)
              \s+
            | //.*
            | /\*(?s:.*?)(?:\*/|\z)
            | "(?:[^"\\]|\\.)*"?
            | `[^`]*`?
            | '(?:[^'\\]|\\.)*'?
            | 0[xX][0-9a-fA-F_]+
            | (?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?
            | [\p{L}_][\p{L}\p{Nd}_]*
            | .
            "#,
        )
        .expect("token grammar is a valid regex")
    })
}

/// Split one line into tokens without substitution.
pub fn tokenize(line: &str) -> Vec<String> {
    token_grammar()
        .find_iter(line)
        .map(|m| m.as_str())
        .filter(|t| {
            !t.starts_with(char::is_whitespace) && !t.starts_with("//") && !t.starts_with("/*")
        })
        .map(str::to_owned)
        .collect()
}

/// Replace every token after the first by its variable value, if any.
pub fn substitute(tokens: &mut [String], vars: &VarStore) {
    for token in tokens.iter_mut().skip(1) {
        if let Some(value) = vars.get(token) {
            *token = value.to_owned();
        }
    }
}

/// Scan and substitute one source line.
pub fn parse_line(line: usize, text: &str, vars: &VarStore) -> Record {
    let mut tokens = tokenize(text);
    substitute(&mut tokens, vars);
    Record::new(line, tokens, text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
