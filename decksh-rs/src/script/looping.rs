//! `for … efor` loops.
//!
//! ```text
//! for v = begin end [incr]      numeric, inclusive of end
//! for v = [a b c]               each list element
//! for v = "file"                each non-empty line of file
//! …body…
//! efor
//! ```
//!
//! The body is read up to the first `efor` line (loops do not nest) and its
//! tokens are substituted once, as it is read.  Each iteration then replaces
//! every body token equal to the loop variable's name with the iteration
//! value and dispatches the result.  List and file values are substituted
//! quoted; numeric values are not.

use crate::error::{CompileError, Fault};
use crate::filesystem::FileSystem;
use crate::markup::{file_name, strip_ends};
use crate::number::{format_number, parse_number};
use crate::var::VarStore;

use super::interp::{Context, LineReader};
use super::scan::{parse_line, Record};

/// Where a loop's values come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopKind {
    Numeric { begin: f64, end: f64, incr: f64 },
    List(Vec<String>),
    File(String),
}

/// A classified loop and its buffered body.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub var: String,
    pub kind: LoopKind,
    pub body: Vec<Record>,
}

// ── Classification ────────────────────────────────────────────────────────────

fn malformed(header: &Record) -> Fault {
    Fault::usage(format!("incorrect for loop: {}", header.tokens.join(" ")))
}

/// Work out the loop variable and value source from a `for` header.
pub fn classify(header: &Record) -> Result<(String, LoopKind), Fault> {
    let n = header.len();
    if n < 4 || header.arg(2) != "=" {
        return Err(malformed(header));
    }
    let var = header.arg(1).to_owned();

    if header.arg(3) == "[" && header.arg(n - 1) == "]" {
        let items = header.tokens[4..n - 1].to_vec();
        return Ok((var, LoopKind::List(items)));
    }

    let source = header.arg(3);
    if n == 4 && source.len() > 3 && source.starts_with('"') && source.ends_with('"') {
        let name = file_name(source).ok_or_else(|| malformed(header))?;
        return Ok((var, LoopKind::File(name.to_owned())));
    }

    if n == 5 || n == 6 {
        let number = |tok: &str| {
            parse_number(tok)
                .filter(|v| v.is_finite())
                .ok_or_else(|| Fault::not_a_number(tok))
        };
        let begin = number(header.arg(3))?;
        let end = number(header.arg(4))?;
        let incr = if n == 6 { number(header.arg(5))? } else { 1.0 };
        if !(incr > 0.0) {
            return Err(Fault::usage(format!(
                "for loop increment must be positive, got {}",
                header.arg(5)
            )));
        }
        return Ok((var, LoopKind::Numeric { begin, end, incr }));
    }

    Err(malformed(header))
}

/// Number of values `begin, begin+incr, …` not exceeding `end`.
pub fn numeric_count(begin: f64, end: f64, incr: f64) -> u64 {
    if !(begin <= end) {
        return 0;
    }
    // saturates for unbounded ranges
    (((end - begin) / incr).floor() as u64).saturating_add(1)
}

/// `item` as a quoted iteration value.  Items that are already quoted keep
/// their quotes rather than gaining a second pair.
pub fn quoted_value(item: &str) -> String {
    let inner = if item.len() >= 2 && item.starts_with('"') && item.ends_with('"') {
        strip_ends(item)
    } else {
        item
    };
    format!("\"{inner}\"")
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Read and substitute body lines up to the closing `efor`.
///
/// A missing `efor` ends the body at end of input.
pub(crate) fn read_body(lines: &mut LineReader<'_>, vars: &VarStore) -> Result<Vec<Record>, CompileError> {
    let mut body = Vec::new();
    while let Some((line, text)) = lines.next_line()? {
        if text.starts_with('#') {
            continue;
        }
        let rec = parse_line(line, &text, vars);
        if rec.is_empty() {
            continue;
        }
        if rec.keyword() == "efor" {
            break;
        }
        body.push(rec);
    }
    Ok(body)
}

/// `rec` with every token (and every whitespace field of its source text)
/// equal to `var` replaced by `value`.
pub fn bind(rec: &Record, var: &str, value: &str) -> Record {
    let tokens = rec
        .tokens
        .iter()
        .map(|t| if t == var { value.to_owned() } else { t.clone() })
        .collect();
    let text = rec
        .text
        .split_whitespace()
        .map(|f| if f == var { value } else { f })
        .collect::<Vec<_>>()
        .join(" ");
    Record::new(rec.line, tokens, text)
}

// ── Execution ─────────────────────────────────────────────────────────────────

impl Loop {
    pub fn new(header: &Record, body: Vec<Record>) -> Result<Self, Fault> {
        let (var, kind) = classify(header)?;
        Ok(Self { var, kind, body })
    }

    /// The values a file loop iterates over.
    fn file_values(name: &str, fs: &dyn FileSystem) -> Result<Vec<String>, Fault> {
        let contents = fs
            .read_to_string(name)
            .map_err(|e| Fault::resource(format!("{name}: {e}")))?;
        Ok(contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(quoted_value)
            .collect())
    }

    fn replay(&self, cx: &mut Context<'_>, value: &str) -> Result<(), Fault> {
        for rec in &self.body {
            cx.dispatch(&bind(rec, &self.var, value))?;
        }
        Ok(())
    }

    /// Run every iteration.
    pub fn run(&self, cx: &mut Context<'_>) -> Result<(), Fault> {
        match &self.kind {
            &LoopKind::Numeric { begin, end, incr } => {
                for k in 0..numeric_count(begin, end, incr) {
                    self.replay(cx, &format_number(begin + k as f64 * incr))?;
                }
            }
            LoopKind::List(items) => {
                for item in items {
                    self.replay(cx, &quoted_value(item))?;
                }
            }
            LoopKind::File(name) => {
                for value in Self::file_values(name, cx.fs())? {
                    self.replay(cx, &value)?;
                }
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
