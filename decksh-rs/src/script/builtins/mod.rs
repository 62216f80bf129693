//! Built-in directives.
//!
//! | Family | Keywords |
//! |--------|----------|
//! | [`structure`] | `deck` `edeck` `canvas` `slide` `eslide` `include` |
//! | [`content`] | `text` `ctext` `etext` `textfile` `rtext` `textblock` `textcode` `image` `cimage` `list` `blist` `nlist` `clist` `li` `elist` `legend` |
//! | [`shapes`] | `rect` `ellipse` `square` `circle` `polygon` `poly` `line` `hline` `vline` `arc` `curve` `arrow` `[lrud]carrow` `[lrud]brace` |
//! | [`external`] | `grid` `chart` `dchart` |
//!
//! Handlers receive the substituted record and write markup through the
//! [`Context`](super::interp::Context).  Arity has already been checked by
//! the time a handler runs.

pub mod content;
pub mod external;
pub mod shapes;
pub mod structure;

use crate::error::Fault;
use crate::number::parse_number;

use super::registry::Registry;
use super::scan::Record;

/// Register every built-in directive.
pub fn register(registry: &mut Registry) {
    structure::register(registry);
    content::register(registry);
    shapes::register(registry);
    external::register(registry);
}

/// Argument `i` of `rec` as a number.
pub(crate) fn number(rec: &Record, i: usize) -> Result<f64, Fault> {
    let token = rec.arg(i);
    parse_number(token).ok_or_else(|| Fault::not_a_number(token))
}

/// Optional numeric argument `i`, or `default` when the record is shorter.
pub(crate) fn number_or(rec: &Record, i: usize, default: f64) -> Result<f64, Fault> {
    if i < rec.len() {
        number(rec, i)
    } else {
        Ok(default)
    }
}

/// Optional argument `i`, or `default` when the record is shorter.
pub(crate) fn arg_or<'r>(rec: &'r Record, i: usize, default: &'r str) -> &'r str {
    if i < rec.len() {
        rec.arg(i)
    } else {
        default
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
