//! Document structure: `deck`, `canvas`, `slide`, the end tags and
//! `include`.

use std::io::Write;

use crate::error::Fault;
use crate::markup::{file_name, quote};
use crate::script::interp::Context;
use crate::script::registry::{Arity, Builtin, Registry};
use crate::script::scan::Record;

pub fn register(registry: &mut Registry) {
    registry.insert("deck", Builtin::new(Arity::any(), "", deck));
    registry.insert_all(
        &["edeck", "eslide", "elist"],
        Builtin::new(Arity::any(), "", end_tag),
    );
    registry.insert("canvas", Builtin::new(Arity::exactly(3), "width height", canvas));
    registry.insert("slide", Builtin::new(Arity::between(1, 3), "[bgcolor] [fgcolor]", slide));
    registry.insert("include", Builtin::new(Arity::exactly(2), "\"file\"", include));
}

fn deck(cx: &mut Context<'_>, _rec: &Record) -> Result<(), Fault> {
    writeln!(cx.out(), "<deck>")?;
    Ok(())
}

/// `edeck` → `</deck>`, and so on.
fn end_tag(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let element = rec.keyword().strip_prefix('e').unwrap_or(rec.keyword());
    writeln!(cx.out(), "</{element}>")?;
    Ok(())
}

fn canvas(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    writeln!(cx.out(), "<canvas width={} height={}/>", quote(rec.arg(1)), quote(rec.arg(2)))?;
    Ok(())
}

fn slide(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    match rec.len() {
        1 => writeln!(cx.out(), "<slide>")?,
        2 => writeln!(cx.out(), "<slide bg={}>", rec.arg(1))?,
        _ => writeln!(cx.out(), "<slide bg={} fg={}>", rec.arg(1), rec.arg(2))?,
    }
    Ok(())
}

fn include(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let name = file_name(rec.arg(1))
        .ok_or_else(|| Fault::usage(format!("{} is not a valid filename", rec.arg(1))))?;
    cx.include(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::filesystem::MemoryFileSystem;
    use crate::script::Compiler;

    fn out(src: &str) -> String {
        let (out, report) = Compiler::new().compile_str(src).unwrap();
        assert!(report.succeeded(), "{:?}", report.errors());
        out
    }

    #[test]
    fn deck_and_end_tags() {
        assert_eq!(out("deck\nedeck\n"), "<deck>\n</deck>\n");
        assert_eq!(out("eslide\nelist\n"), "</slide>\n</list>\n");
    }

    #[test]
    fn canvas_quotes_dimensions() {
        assert_eq!(out("canvas 1024 768\n"), "<canvas width=\"1024\" height=\"768\"/>\n");
    }

    #[test]
    fn slide_colors_verbatim() {
        assert_eq!(out("slide\n"), "<slide>\n");
        assert_eq!(out("slide \"black\"\n"), "<slide bg=\"black\">\n");
        assert_eq!(
            out("slide \"black\" \"white\"\n"),
            "<slide bg=\"black\" fg=\"white\">\n"
        );
    }

    #[test]
    fn slide_usage() {
        let (_, report) = Compiler::new().compile_str("slide a b c\n").unwrap();
        assert_eq!(report.errors()[0].message, "slide [bgcolor] [fgcolor]");
    }

    #[test]
    fn include_needs_quoted_name() {
        let fs = MemoryFileSystem::new().with_file("a.dsh", "deck\n");
        let (_, report) = Compiler::new().with_file_system(fs).compile_str("include a.dsh\n").unwrap();
        // `a.dsh` scans as three tokens
        assert_eq!(report.errors()[0].kind, ErrorKind::Usage);
    }

    #[test]
    fn include_emits_in_place() {
        let fs = MemoryFileSystem::new().with_file("body.dsh", "slide\neslide\n");
        let (out, report) = Compiler::new()
            .with_file_system(fs)
            .compile_str("deck\ninclude \"body.dsh\"\nedeck\n")
            .unwrap();
        assert!(report.succeeded());
        assert_eq!(out, "<deck>\n<slide>\n</slide>\n</deck>\n");
    }
}
