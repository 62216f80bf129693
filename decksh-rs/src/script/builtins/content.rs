//! Text, images and lists.

use std::io::Write;

use crate::error::{ErrorKind, Fault};
use crate::markup::{escape, quote, text_content, FONT_COLOR_OPACITY, FONT_COLOR_OPACITY_LP};
use crate::number::{format_number, parse_number};
use crate::script::interp::Context;
use crate::script::registry::{Arity, Builtin, Registry};
use crate::script::scan::Record;

use super::number;

pub fn register(registry: &mut Registry) {
    registry.insert_all(
        &["text", "ctext", "etext"],
        Builtin::new(Arity::at_least(5), "\"text\" x y size [font] [color] [opacity] [link]", text),
    );
    registry.insert(
        "textfile",
        Builtin::new(
            Arity::at_least(5),
            "\"file\" x y size [font] [color] [opacity] [lp] [link] [rotation]",
            textfile,
        ),
    );
    registry.insert(
        "rtext",
        Builtin::new(Arity::at_least(6), "\"text\" x y angle size [font] [color] [opacity] [link]", rtext),
    );
    registry.insert(
        "textblock",
        Builtin::new(Arity::at_least(6), "\"text\" x y width size [font] [color] [opacity] [link]", textblock),
    );
    registry.insert(
        "textcode",
        Builtin::new(Arity::between(6, 7), "\"file\" x y width size [color]", textcode),
    );
    registry.insert(
        "image",
        Builtin::new(Arity::between(6, 8), "\"image-file\" x y w h [scale] [link]", image),
    );
    registry.insert(
        "cimage",
        Builtin::new(Arity::between(7, 9), "\"image-file\" \"caption\" x y w h [scale] [link]", cimage),
    );
    registry.insert_all(
        &["list", "blist", "nlist", "clist"],
        Builtin::new(Arity::at_least(4), "x y size [font] [color] [opacity] [lp] [link]", list),
    );
    registry.insert("li", Builtin::new(Arity::any(), "[\"text\"] [font] [color] [opacity] [link]", list_item));
    registry.insert(
        "legend",
        Builtin::new(Arity::at_least(7), "\"text\" x y size font color", legend),
    );
}

// ── Text ──────────────────────────────────────────────────────────────────────

fn text(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let align = match rec.keyword() {
        "ctext" => "align=\"c\" ",
        "etext" => "align=\"e\" ",
        _ => "",
    };
    writeln!(
        cx.out(),
        "<text {align}xp={} yp={} sp={} {}>{}</text>",
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        FONT_COLOR_OPACITY.render(rec.rest(5)),
        text_content(rec.arg(1)),
    )?;
    Ok(())
}

/// Text whose content is read from a file by the renderer.
fn textfile(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    writeln!(
        cx.out(),
        "<text file={} xp={} yp={} sp={} {}/>",
        rec.arg(1),
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        FONT_COLOR_OPACITY_LP.render(rec.rest(5)),
    )?;
    Ok(())
}

fn rtext(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let angle = rec.arg(4);
    match parse_number(angle) {
        Some(a) if a <= 360.0 => {}
        _ => {
            return Err(Fault::new(
                ErrorKind::Number,
                format!("{angle} is not a valid rotation angle"),
            ))
        }
    }
    writeln!(
        cx.out(),
        "<text xp={} yp={} rotation={} sp={} {}>{}</text>",
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(angle),
        quote(rec.arg(5)),
        FONT_COLOR_OPACITY.render(rec.rest(6)),
        text_content(rec.arg(1)),
    )?;
    Ok(())
}

fn textblock(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    writeln!(
        cx.out(),
        "<text type=\"block\" xp={} yp={} wp={} sp={} {}>{}</text>",
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        quote(rec.arg(5)),
        FONT_COLOR_OPACITY.render(rec.rest(6)),
        text_content(rec.arg(1)),
    )?;
    Ok(())
}

fn textcode(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let head = format!(
        "<text type=\"code\" file={} xp={} yp={} wp={} sp={}",
        rec.arg(1),
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        quote(rec.arg(5)),
    );
    if rec.len() == 7 {
        writeln!(cx.out(), "{head} color={}/>", rec.arg(6))?;
    } else {
        writeln!(cx.out(), "{head}/>")?;
    }
    Ok(())
}

// ── Images ────────────────────────────────────────────────────────────────────

/// ` scale=… [link=…]` for the optional trailing image arguments.
fn image_tail(rec: &Record, from: usize) -> String {
    let mut tail = String::new();
    if rec.len() > from {
        tail.push_str(&format!(" scale={}", quote(rec.arg(from))));
    }
    if rec.len() > from + 1 {
        tail.push_str(&format!(" link={}", rec.arg(from + 1)));
    }
    tail
}

fn image(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    writeln!(
        cx.out(),
        "<image name={} xp={} yp={} width={} height={}{}/>",
        rec.arg(1),
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        quote(rec.arg(5)),
        image_tail(rec, 6),
    )?;
    Ok(())
}

/// Captioned image.  The caption keeps its quotes.
fn cimage(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    writeln!(
        cx.out(),
        "<image name={} caption={} xp={} yp={} width={} height={}{}/>",
        rec.arg(1),
        escape(rec.arg(2)),
        quote(rec.arg(3)),
        quote(rec.arg(4)),
        quote(rec.arg(5)),
        quote(rec.arg(6)),
        image_tail(rec, 7),
    )?;
    Ok(())
}

// ── Lists ─────────────────────────────────────────────────────────────────────

fn list(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let kind = match rec.keyword() {
        "blist" => "type=\"bullet\" ",
        "nlist" => "type=\"number\" ",
        "clist" => "align=\"center\" ",
        _ => "",
    };
    writeln!(
        cx.out(),
        "<list {kind}xp={} yp={} sp={} {}>",
        quote(rec.arg(1)),
        quote(rec.arg(2)),
        quote(rec.arg(3)),
        FONT_COLOR_OPACITY_LP.render(rec.rest(4)),
    )?;
    Ok(())
}

fn list_item(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    match rec.len() {
        0 | 1 => writeln!(cx.out(), "<li/>")?,
        2 => writeln!(cx.out(), "<li>{}</li>", text_content(rec.arg(1)))?,
        _ => writeln!(
            cx.out(),
            "<li {}>{}</li>",
            FONT_COLOR_OPACITY.render(rec.rest(2)),
            text_content(rec.arg(1)),
        )?,
    }
    Ok(())
}

// ── Legend ────────────────────────────────────────────────────────────────────

/// A label with a round colour key to its left.
fn legend(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let x = number(rec, 2)?;
    let y = number(rec, 3)?;
    let size = quote(rec.arg(4));
    writeln!(
        cx.out(),
        "<text xp={} yp={} sp={size} {}>{}</text>",
        quote(&format_number(x + 2.0)),
        quote(rec.arg(3)),
        FONT_COLOR_OPACITY.render(rec.rest(5)),
        text_content(rec.arg(1)),
    )?;
    writeln!(
        cx.out(),
        "<ellipse xp={} yp={} wp={size} hr=\"100\" color={}/>",
        quote(rec.arg(2)),
        quote(&format_number(y + 0.5)),
        rec.arg(6),
    )?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
