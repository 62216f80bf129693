//! Directives that pull content from outside the script: `grid` lays out
//! the lines of a file, `chart` and `dchart` splice in the output of an
//! external chart program.

use std::io::Write;

use crate::error::{ErrorKind, Fault};
use crate::markup::file_name;
use crate::number::{format_number, parse_number};
use crate::script::interp::Context;
use crate::script::registry::{Arity, Builtin, Registry};
use crate::script::scan::{parse_line, Record};

pub fn register(registry: &mut Registry) {
    registry.insert(
        "grid",
        Builtin::new(Arity::at_least(7), "\"file\" x y xint yint xlimit", grid),
    );
    registry.insert_all(&["chart", "dchart"], Builtin::new(Arity::any(), "[args]", chart));
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Resolve argument `i` through the variable store and parse it.
fn grid_number(cx: &Context<'_>, rec: &Record, i: usize) -> Result<f64, Fault> {
    let token = cx.vars().resolve(rec.arg(i));
    parse_number(token).ok_or_else(|| Fault::not_a_number(token))
}

/// Run each non-empty line of a file as a directive, with the tokens `x`
/// and `y` bound to a cursor.  The cursor starts at `(x, y)` and moves
/// `xint` right after every line; once it passes `xlimit` it returns to `x`
/// and drops `yint`.
fn grid(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let x = grid_number(cx, rec, 2)?;
    let y = grid_number(cx, rec, 3)?;
    let xint = grid_number(cx, rec, 4)?;
    let yint = grid_number(cx, rec, 5)?;
    let limit = grid_number(cx, rec, 6)?;
    let name = file_name(rec.arg(1))
        .ok_or_else(|| Fault::usage(format!("{} is not a valid filename", rec.arg(1))))?;
    let source = cx
        .fs()
        .read_to_string(name)
        .map_err(|e| Fault::resource(format!("{name}: {e}")))?;

    let (mut xp, mut yp) = (x, y);
    for text in source.lines() {
        if xp > limit {
            xp = x;
            yp -= yint;
        }
        if text.is_empty() {
            continue;
        }
        let mut cell = parse_line(rec.line, text, cx.vars());
        if cell.len() >= 3 {
            let (xs, ys) = (format_number(xp), format_number(yp));
            for token in cell.tokens.iter_mut() {
                if token == "x" {
                    *token = xs.clone();
                } else if token == "y" {
                    *token = ys.clone();
                }
            }
            cx.dispatch(&cell)?;
        }
        xp += xint;
    }
    Ok(())
}

// ── Charts ────────────────────────────────────────────────────────────────────

/// The chart command line: the directive's source words with variables
/// substituted and quotes removed, re-split on whitespace.
pub fn chart_argv(rec: &Record, resolve: impl Fn(&str) -> String) -> Vec<String> {
    let words: Vec<String> = rec
        .text
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                return word.to_owned();
            }
            let value = resolve(word);
            if value.len() > 2 && value.starts_with('"') && value.ends_with('"') {
                value[1..value.len() - 1].to_owned()
            } else {
                value
            }
        })
        .collect();
    words
        .join(" ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Run the program named by the keyword and copy its output into the
/// markup.
fn chart(cx: &mut Context<'_>, rec: &Record) -> Result<(), Fault> {
    let argv = chart_argv(rec, |word| cx.vars().resolve(word).to_owned());
    let output = cx
        .runner()
        .run(&argv)
        .map_err(|e| Fault::new(ErrorKind::Process, format!("[{}] - {e}", argv.join(" "))))?;
    let out = cx.out();
    out.write_all(&output)?;
    out.write_all(b"\n")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::Report;
    use crate::filesystem::MemoryFileSystem;
    use crate::process::ProcessRunner;
    use crate::script::Compiler;
    use crate::var::VarStore;

    /// Records every command line and answers with canned output.
    #[derive(Clone, Default)]
    struct Canned {
        calls: Rc<RefCell<Vec<Vec<String>>>>,
        fail: bool,
    }

    impl ProcessRunner for Canned {
        fn run(&self, argv: &[String]) -> Result<Vec<u8>, String> {
            self.calls.borrow_mut().push(argv.to_vec());
            if self.fail {
                Err("exit status: 1".to_owned())
            } else {
                Ok(b"<rect xp=\"1\"/>".to_vec())
            }
        }
    }

    fn grid_out(file: &str, src: &str) -> (String, Report) {
        let fs = MemoryFileSystem::new().with_file("cells.dsh", file);
        Compiler::new().with_file_system(fs).compile_str(src).unwrap()
    }

    #[test]
    fn grid_walks_and_wraps() {
        let file = "circle x y 2\ncircle x y 2\ncircle x y 2\n";
        let (out, report) = grid_out(file, "grid \"cells.dsh\" 10 80 20 15 30\n");
        assert!(report.succeeded(), "{:?}", report.errors());
        assert_eq!(
            out,
            "<ellipse xp=\"10\" yp=\"80\" wp=\"2\" hr=\"100\"/>\n\
             <ellipse xp=\"30\" yp=\"80\" wp=\"2\" hr=\"100\"/>\n\
             <ellipse xp=\"10\" yp=\"65\" wp=\"2\" hr=\"100\"/>\n"
        );
    }

    #[test]
    fn grid_skips_empty_and_short_lines() {
        let file = "\ncircle x y 2\nli\ncircle x y 2\n";
        let (out, _) = grid_out(file, "grid \"cells.dsh\" 0 50 10 10 100\n");
        assert_eq!(
            out,
            "<ellipse xp=\"0\" yp=\"50\" wp=\"2\" hr=\"100\"/>\n\
             <ellipse xp=\"20\" yp=\"50\" wp=\"2\" hr=\"100\"/>\n"
        );
    }

    #[test]
    fn grid_arguments_resolve_variables() {
        let (out, report) =
            grid_out("square x y 1\n", "left = 5\ngrid \"cells.dsh\" left 50 10 10 100\n");
        assert!(report.succeeded());
        assert_eq!(out, "<rect xp=\"5\" yp=\"50\" wp=\"1\" hr=\"100\"/>\n");
    }

    #[test]
    fn grid_errors() {
        let (_, report) = grid_out("", "grid \"missing.dsh\" 0 0 1 1 1\ngrid \"cells.dsh\" a 0 1 1 1\n");
        assert_eq!(report.errors()[0].kind, ErrorKind::Resource);
        assert_eq!(report.errors()[1].message, "a is not a number");
    }

    #[test]
    fn grid_cell_errors_report_grid_line() {
        let (_, report) = grid_out("canvas x y\n", "deck\ngrid \"cells.dsh\" 0 0 1 1 1\n");
        assert_eq!(report.len(), 0);
        let (_, report) = grid_out("hline x y len\n", "deck\ngrid \"cells.dsh\" 0 0 1 1 1\n");
        assert_eq!(report.errors()[0].line, 2);
    }

    #[test]
    fn chart_argv_substitutes_and_unquotes() {
        let mut vars = VarStore::new();
        vars.set("left", "10");
        vars.set("file", "\"sales.d\"");
        let rec = Record::new(1, vec![], "chart -left left -bar  file");
        let argv = chart_argv(&rec, |w| vars.resolve(w).to_owned());
        assert_eq!(argv, vec!["chart", "-left", "10", "-bar", "sales.d"]);
    }

    #[test]
    fn chart_argv_resplits_values() {
        let mut vars = VarStore::new();
        vars.set("opts", "\"-grid -val\"");
        let rec = Record::new(1, vec![], "dchart opts");
        let argv = chart_argv(&rec, |w| vars.resolve(w).to_owned());
        assert_eq!(argv, vec!["dchart", "-grid", "-val"]);
    }

    #[test]
    fn chart_output_is_spliced() {
        let runner = Canned::default();
        let mut compiler = Compiler::new().with_runner(runner.clone());
        let (out, report) = compiler.compile_str("top = 80\nslide\nchart -top top data.d\neslide\n").unwrap();
        assert!(report.succeeded());
        assert_eq!(out, "<slide>\n<rect xp=\"1\"/>\n</slide>\n");
        assert_eq!(runner.calls.borrow()[0], vec!["chart", "-top", "80", "data.d"]);
    }

    #[test]
    fn chart_failure_is_a_process_error() {
        let runner = Canned { fail: true, ..Canned::default() };
        let (out, report) = Compiler::new().with_runner(runner).compile_str("dchart -bar x.d\n").unwrap();
        assert_eq!(out, "");
        let e = &report.errors()[0];
        assert_eq!(e.kind, ErrorKind::Process);
        assert_eq!(e.message, "[dchart -bar x.d] - exit status: 1");
    }

    #[test]
    fn chart_in_a_loop_sees_the_loop_value() {
        let runner = Canned::default();
        let mut compiler = Compiler::new().with_runner(runner.clone());
        compiler.compile_str("for y = 10 20 10\nchart -top y d.d\nefor\n").unwrap();
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], vec!["chart", "-top", "10", "d.d"]);
        assert_eq!(calls[1], vec!["chart", "-top", "20", "d.d"]);
    }
}
