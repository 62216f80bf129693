//! Keyword table.
//!
//! Every single-line directive is a [`Directive`] registered under one or
//! more keywords.  The dispatcher looks a line's first token up here, checks
//! the token count against the directive's [`Arity`], and runs it.  Lines
//! whose keyword is not registered fall through to assignment handling.
//!
//! `for` and `data` are not in the table: they consume the lines that
//! follow them and are handled by the line loop in [`super::interp`].

use std::collections::HashMap;
use std::fmt;

use crate::error::Fault;

use super::interp::Context;
use super::scan::Record;

// ── Arity ─────────────────────────────────────────────────────────────────────

/// Accepted token counts, keyword included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    pub const fn any() -> Self {
        Self { min: 0, max: None }
    }

    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            None if self.min == 0 => f.write_str("any number of tokens"),
            None => write!(f, "at least {} tokens", self.min),
            Some(max) if max == self.min => write!(f, "{max} tokens"),
            Some(max) => write!(f, "{}-{max} tokens", self.min),
        }
    }
}

// ── Directive ─────────────────────────────────────────────────────────────────

/// A keyword's behaviour.
pub trait Directive {
    /// Token counts this directive accepts.
    fn arity(&self) -> Arity;

    /// Argument synopsis printed after the keyword when the arity check fails.
    fn usage(&self) -> &str;

    /// Carry out the directive.  Only called with an accepted token count.
    fn run(&self, cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault>;
}

/// Handler signature for [`Builtin`] directives.
pub type Handler = fn(&mut Context<'_>, &Record) -> Result<(), Fault>;

/// A directive implemented by a plain function.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub arity: Arity,
    pub usage: &'static str,
    pub handler: Handler,
}

impl Builtin {
    pub const fn new(arity: Arity, usage: &'static str, handler: Handler) -> Self {
        Self { arity, usage, handler }
    }
}

impl Directive for Builtin {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn usage(&self) -> &str {
        self.usage
    }

    fn run(&self, cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
        (self.handler)(cx, rec)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Keyword → directive.
#[derive(Default)]
pub struct Registry {
    table: HashMap<String, Box<dyn Directive>>,
}

impl Registry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full standard vocabulary.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        super::builtins::register(&mut registry);
        registry
    }

    /// Register `directive` under `keyword`, replacing any previous entry.
    pub fn insert(&mut self, keyword: impl Into<String>, directive: impl Directive + 'static) {
        self.table.insert(keyword.into(), Box::new(directive));
    }

    /// Register one builtin under several keywords.
    pub fn insert_all(&mut self, keywords: &[&str], builtin: Builtin) {
        for &keyword in keywords {
            self.insert(keyword, builtin);
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&dyn Directive> {
        self.table.get(keyword).map(|d| d.as_ref())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.table.contains_key(keyword)
    }

    /// Registered keywords, sorted.
    pub fn keywords(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("keywords", &self.keywords()).finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
