//! Markup emitter helpers.
//!
//! Element layouts live with the directive handlers; this module owns the
//! pieces they share:
//!
//! - [`escape`]: replace the reserved characters `&`, `<` and `>`
//! - [`text_content`]: strip a literal's delimiters, then escape
//! - [`quote`]: write a token as a quoted attribute value
//! - [`Clause`]: optional trailing attributes filled from however many
//!   tokens are present
//!
//! Escaping is one-way.  Applying it twice turns `&amp;` into `&amp;amp;`,
//! so handlers escape each raw literal exactly once.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;

const RESERVED: [&str; 3] = ["&", "<", ">"];
const ENTITIES: [&str; 3] = ["&amp;", "&lt;", "&gt;"];

fn escaper() -> &'static AhoCorasick {
    static ESCAPER: OnceLock<AhoCorasick> = OnceLock::new();
    ESCAPER.get_or_init(|| AhoCorasick::new(RESERVED))
}

/// Escape `&`, `<` and `>` in free text.
pub fn escape(text: &str) -> String {
    escaper().replace_all(text, &ENTITIES)
}

/// Drop the first and last character of `s`.
pub(crate) fn strip_ends(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Text content of a quoted literal: delimiters removed, reserved
/// characters escaped.  Tokens too short to hold any content yield `""`.
pub fn text_content(token: &str) -> String {
    if token.len() < 3 {
        return String::new();
    }
    escape(strip_ends(token))
}

/// The name inside a quoted file-name token (`"data.d"` → `data.d`).
pub fn file_name(token: &str) -> Option<&str> {
    if token.len() < 3 || (!token.starts_with('"') && !token.ends_with('"')) {
        return None;
    }
    Some(strip_ends(token))
}

/// Quote `s` as an attribute value, backslash-escaping quotes, backslashes
/// and control characters.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            c if c.is_control() => {
                let n = c as u32;
                if n < 0x80 {
                    out.push_str(&format!("\\x{n:02x}"));
                } else {
                    out.push_str(&format!("\\u{n:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ── Attribute clauses ─────────────────────────────────────────────────────────

/// How a clause attribute's value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Copied from the token as-is (the token carries its own quotes).
    Verbatim,
    /// Wrapped with [`quote`].
    Quoted,
}

/// An ordered list of optional attributes.  Tokens fill the attributes from
/// the front; attributes without a token are left out.
#[derive(Debug, Clone, Copy)]
pub struct Clause(&'static [(&'static str, Style)]);

/// `font color opacity link`
pub const FONT_COLOR_OPACITY: Clause = Clause(&[
    ("font", Style::Verbatim),
    ("color", Style::Verbatim),
    ("opacity", Style::Quoted),
    ("link", Style::Verbatim),
]);

/// `font color opacity lp link rotation`
pub const FONT_COLOR_OPACITY_LP: Clause = Clause(&[
    ("font", Style::Verbatim),
    ("color", Style::Verbatim),
    ("opacity", Style::Quoted),
    ("lp", Style::Quoted),
    ("link", Style::Verbatim),
    ("rotation", Style::Quoted),
]);

/// `color opacity` of filled shapes.
pub const FILL: Clause = Clause(&[("color", Style::Verbatim), ("opacity", Style::Quoted)]);

/// `sp color opacity` of stroked shapes.
pub const STROKE: Clause = Clause(&[
    ("sp", Style::Quoted),
    ("color", Style::Verbatim),
    ("opacity", Style::Quoted),
]);

impl Clause {
    /// Number of attributes this clause can carry.
    pub fn capacity(&self) -> usize {
        self.0.len()
    }

    /// Render the attributes filled by `values`.
    ///
    /// More values than the clause has attributes renders nothing at all.
    pub fn render<S: AsRef<str>>(&self, values: &[S]) -> String {
        if values.len() > self.0.len() {
            return String::new();
        }
        self.0
            .iter()
            .zip(values)
            .map(|(&(name, style), value)| {
                let value = value.as_ref();
                match style {
                    Style::Verbatim => format!("{name}={value}"),
                    Style::Quoted => format!("{name}={}", quote(value)),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `head` followed by `clause` separated by one space, or just `head` when
/// the clause is empty.
pub fn with_clause(head: &str, clause: &str) -> String {
    if clause.is_empty() {
        head.to_owned()
    } else {
        format!("{head} {clause}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
