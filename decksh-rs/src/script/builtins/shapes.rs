//! Graphics: basic shapes, lines and curves, arrows and braces.
//!
//! Basic shapes copy their coordinates straight into the markup.  Arrows and
//! braces are computed: their arguments must be numbers, and the points
//! they produce are written in the shortest decimal form (arrows) or with
//! two decimals (braces).

use std::io::Write;

use crate::error::Fault;
use crate::geometry::{
    axis_arrowhead, brace, straight_arrowhead, Arrowhead, Direction, Point, Segment, STD_NOTCH,
};
use crate::markup::{quote, with_clause, FILL, STROKE};
use crate::number::{format_fixed2, format_number};
use crate::script::interp::Context;
use crate::script::registry::{Arity, Builtin, Registry};
use crate::script::scan::Record;

use super::{arg_or, number, number_or};

const ARROW_WIDTH: f64 = 3.0;
const ARROW_HEIGHT: f64 = 3.0;
const ARROW_LINE_WIDTH: &str = "0.2";
const ARROW_COLOR: &str = "\"gray\"";
const ARROW_OPACITY: &str = "100";

pub fn register(registry: &mut Registry) {
    registry.insert_all(
        &["rect", "ellipse"],
        Builtin::new(Arity::between(5, 7), "x y w h [color] [opacity]", rect),
    );
    registry.insert_all(
        &["square", "circle"],
        Builtin::new(Arity::between(4, 6), "x y w [color] [opacity]", square),
    );
    registry.insert_all(
        &["polygon", "poly"],
        Builtin::new(Arity::between(3, 5), "\"xcoord\" \"ycoord\" [color] [opacity]", polygon),
    );
    registry.insert(
        "line",
        Builtin::new(Arity::between(5, 8), "x1 y1 x2 y2 [size] [color] [opacity]", line),
    );
    registry.insert_all(
        &["hline", "vline"],
        Builtin::new(Arity::between(4, 7), "x y length [size] [color] [opacity]", axis_line),
    );
    registry.insert(
        "arc",
        Builtin::new(Arity::between(7, 10), "cx cy w h a1 a2 [size] [color] [opacity]", arc),
    );
    registry.insert(
        "curve",
        Builtin::new(Arity::between(7, 10), "x1 y1 x2 y2 x3 y3 [size] [color] [opacity]", curve),
    );
    registry.insert(
        "arrow",
        Builtin::new(
            Arity::at_least(5),
            "x1 y1 x2 y2 [linewidth] [arrowidth] [arrowheight] [color] [opacity]",
            arrow,
        ),
    );
    registry.insert_all(
        &["lcarrow", "rcarrow", "ucarrow", "dcarrow"],
        Builtin::new(
            Arity::at_least(7),
            "x1 y1 x2 y2 x3 y3 [linewidth] [arrowidth] [arrowheight] [color] [opacity]",
            curved_arrow,
        ),
    );
    registry.insert_all(
        &["lbrace", "rbrace", "ubrace", "dbrace"],
        Builtin::new(
            Arity::at_least(6),
            "x y size aw ah [linewidth] [color] [opacity]",
            brace_shape,
        ),
    );
}

// ── Basic shapes ──────────────────────────────────────────────────────────────

/// `<name k1="v1" k2="v2" …` with every value quoted.
fn element(name: &str, attrs: &[(&str, &str)]) -> String {
    let mut s = format!("<{name}");
    for (key, value) in attrs {
        s.push_str(&format!(" {key}={}", quote(value)));
    }
    s
}

fn rect(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = element(
        rec.keyword(),
        &[("xp", rec.arg(1)), ("yp", rec.arg(2)), ("wp", rec.arg(3)), ("hp", rec.arg(4))],
    );
    writeln!(cx.out(), "{}/>", with_clause(&head, &FILL.render(rec.rest(5))))?;
    Ok(())
}

/// `square` and `circle`: a rect or ellipse with a 100% height ratio.
fn square(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let name = if rec.keyword() == "square" { "rect" } else { "ellipse" };
    let head = element(name, &[("xp", rec.arg(1)), ("yp", rec.arg(2)), ("wp", rec.arg(3))]);
    let head = format!("{head} hr=\"100\"");
    writeln!(cx.out(), "{}/>", with_clause(&head, &FILL.render(rec.rest(4))))?;
    Ok(())
}

/// Coordinate lists are passed through with their quotes.
fn polygon(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = format!("<polygon xc={} yc={}", rec.arg(1), rec.arg(2));
    writeln!(cx.out(), "{}/>", with_clause(&head, &FILL.render(rec.rest(3))))?;
    Ok(())
}

fn line(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = element(
        "line",
        &[("xp1", rec.arg(1)), ("yp1", rec.arg(2)), ("xp2", rec.arg(3)), ("yp2", rec.arg(4))],
    );
    writeln!(cx.out(), "{}/>", with_clause(&head, &STROKE.render(rec.rest(5))))?;
    Ok(())
}

/// `hline x y length` and `vline x y length`.
fn axis_line(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let (x, y) = (rec.arg(1), rec.arg(2));
    let length = number(rec, 3)?;
    let end = if rec.keyword() == "hline" {
        format_number(number(rec, 1)? + length)
    } else {
        format_number(number(rec, 2)? + length)
    };
    let head = if rec.keyword() == "hline" {
        element("line", &[("xp1", x), ("yp1", y), ("xp2", end.as_str()), ("yp2", y)])
    } else {
        element("line", &[("xp1", x), ("yp1", y), ("xp2", x), ("yp2", end.as_str())])
    };
    writeln!(cx.out(), "{}/>", with_clause(&head, &STROKE.render(rec.rest(4))))?;
    Ok(())
}

fn arc(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = element(
        "arc",
        &[
            ("xp", rec.arg(1)),
            ("yp", rec.arg(2)),
            ("wp", rec.arg(3)),
            ("hp", rec.arg(4)),
            ("a1", rec.arg(5)),
            ("a2", rec.arg(6)),
        ],
    );
    writeln!(cx.out(), "{}/>", with_clause(&head, &STROKE.render(rec.rest(7))))?;
    Ok(())
}

fn curve(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = element(
        "curve",
        &[
            ("xp1", rec.arg(1)),
            ("yp1", rec.arg(2)),
            ("xp2", rec.arg(3)),
            ("yp2", rec.arg(4)),
            ("xp3", rec.arg(5)),
            ("yp3", rec.arg(6)),
        ],
    );
    writeln!(cx.out(), "{}/>", with_clause(&head, &STROKE.render(rec.rest(7))))?;
    Ok(())
}

// ── Arrows ────────────────────────────────────────────────────────────────────

/// Stroke settings shared by an arrow's shaft and head.
struct ArrowStyle<'r> {
    width: &'r str,
    color: &'r str,
    opacity: &'r str,
}

impl ArrowStyle<'_> {
    fn attrs(&self) -> String {
        format!("sp={} color={} opacity={}", quote(self.width), self.color, quote(self.opacity))
    }
}

fn write_head(cx: &mut Context<'_>, head: &Arrowhead, style: &ArrowStyle<'_>) -> Result<(), Fault> {
    let points = head.points();
    let xs: Vec<String> = points.iter().map(|p| format_number(p.x)).collect();
    let ys: Vec<String> = points.iter().map(|p| format_number(p.y)).collect();
    writeln!(
        cx.out(),
        "<polygon xc=\"{}\" yc=\"{}\" color={} opacity={}/>",
        xs.join(" "),
        ys.join(" "),
        style.color,
        quote(style.opacity),
    )?;
    Ok(())
}

/// Straight arrow: a shaft ending at the notch plus a polygon head.
fn arrow(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let x1 = number(rec, 1)?;
    let y1 = number(rec, 2)?;
    let x2 = number(rec, 3)?;
    let y2 = number(rec, 4)?;
    let aw = number_or(rec, 6, ARROW_WIDTH)?;
    let ah = number_or(rec, 7, ARROW_HEIGHT)?;
    let style = ArrowStyle {
        width: arg_or(rec, 5, ARROW_LINE_WIDTH),
        color: arg_or(rec, 8, ARROW_COLOR),
        opacity: arg_or(rec, 9, ARROW_OPACITY),
    };

    let head = straight_arrowhead(x1, y1, x2, y2, aw, ah);
    writeln!(
        cx.out(),
        "<line xp1={} yp1={} xp2={} yp2={} {}/>",
        quote(rec.arg(1)),
        quote(rec.arg(2)),
        quote(&format_number(head.notch.x)),
        quote(&format_number(head.notch.y)),
        style.attrs(),
    )?;
    write_head(cx, &head, &style)
}

/// Curved arrow: a quadratic curve from `(x1, y1)` via `(x2, y2)` whose end
/// is pulled back to the notch of an axis-aligned head at `(x3, y3)`.
fn curved_arrow(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let dir = Direction::from_initial(rec.keyword())
        .ok_or_else(|| Fault::usage("use lcarrow, rcarrow, ucarrow or dcarrow"))?;
    let x = number(rec, 5)?;
    let y = number(rec, 6)?;
    let aw = number_or(rec, 8, ARROW_WIDTH)?;
    let ah = number_or(rec, 9, ARROW_HEIGHT)?;
    let style = ArrowStyle {
        width: arg_or(rec, 7, ARROW_LINE_WIDTH),
        color: arg_or(rec, 10, ARROW_COLOR),
        opacity: arg_or(rec, 11, ARROW_OPACITY),
    };

    let head = axis_arrowhead(x, y, aw, ah, STD_NOTCH, dir);
    writeln!(
        cx.out(),
        "<curve xp1={} yp1={} xp2={} yp2={} xp3={} yp3={} {}/>",
        quote(rec.arg(1)),
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        quote(&format_number(head.notch.x)),
        quote(&format_number(head.notch.y)),
        style.attrs(),
    )?;
    write_head(cx, &head, &style)
}

// ── Braces ────────────────────────────────────────────────────────────────────

/// ` sp="…" color=… opacity="…"` from the optional brace arguments.
fn brace_attrs(rec: &Record) -> Result<String, Fault> {
    let mut attrs = String::new();
    if rec.len() > 6 {
        number(rec, 6)?;
        attrs.push_str(&format!("sp=\"{}\"", rec.arg(6)));
    }
    if rec.len() > 7 {
        attrs.push_str(&format!(" color={}", rec.arg(7)));
    }
    if rec.len() > 8 {
        number(rec, 8)?;
        attrs.push_str(&format!(" opacity=\"{}\"", rec.arg(8)));
    }
    Ok(attrs)
}

fn fixed(p: Point) -> (String, String) {
    (format_fixed2(p.x), format_fixed2(p.y))
}

fn brace_shape(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let dir = Direction::from_initial(rec.keyword()).ok_or_else(|| {
        Fault::usage("use lbrace (left), rbrace (right), ubrace (up), dbrace (down)")
    })?;
    let x = number(rec, 1)?;
    let y = number(rec, 2)?;
    let size = number(rec, 3)?;
    let aw = number(rec, 4)?;
    let ah = number(rec, 5)?;
    let attrs = brace_attrs(rec)?;

    for segment in brace(x, y, size, aw, ah, dir) {
        match segment {
            Segment::Curve(p1, p2, p3) => {
                let ((x1, y1), (x2, y2), (x3, y3)) = (fixed(p1), fixed(p2), fixed(p3));
                writeln!(
                    cx.out(),
                    "<curve xp1=\"{x1}\" yp1=\"{y1}\" xp2=\"{x2}\" yp2=\"{y2}\" xp3=\"{x3}\" yp3=\"{y3}\" {attrs}/>"
                )?;
            }
            Segment::Line(p1, p2) => {
                let ((x1, y1), (x2, y2)) = (fixed(p1), fixed(p2));
                writeln!(cx.out(), "<line xp1=\"{x1}\" yp1=\"{y1}\" xp2=\"{x2}\" yp2=\"{y2}\" {attrs}/>")?;
            }
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
