//! decksh compiler.
//!
//! The [`Compiler`] owns the variable store, the keyword [`Registry`] and
//! the collaborators directives reach out to (files, external programs, the
//! random source).  A compilation reads the script line by line, scans and
//! substitutes each line, then either runs a block directive (`for`,
//! `data`), dispatches a keyword, or evaluates an assignment.
//!
//! Directive failures are collected into a [`Report`] and compilation
//! carries on; only read and write failures on the streams themselves
//! abort with a [`CompileError`].

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::{CompileError, DirectiveError, ErrorKind, Fault, Report};
use crate::filesystem::{FileSystem, OsFileSystem};
use crate::markup::file_name;
use crate::process::{ProcessRunner, SystemRunner};
use crate::var::VarStore;

use super::assign;
use super::looping::{self, Loop};
use super::registry::{Directive, Registry};
use super::scan::{parse_line, Record};

// ── Line reader ───────────────────────────────────────────────────────────────

/// Numbered lines of a script, with line terminators removed.
pub(crate) struct LineReader<'r> {
    input: &'r mut dyn BufRead,
    line: usize,
}

impl<'r> LineReader<'r> {
    pub(crate) fn new(input: &'r mut dyn BufRead) -> Self {
        Self { input, line: 0 }
    }

    /// Next `(line number, text)`, or `None` at end of input.  Bytes that
    /// are not UTF-8 come through as U+FFFD.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, String)>, CompileError> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf).map_err(CompileError::Read)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some((self.line, String::from_utf8_lossy(&buf).into_owned())))
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Everything a compilation mutates or consults besides the output.
pub(crate) struct State {
    pub vars: VarStore,
    pub config: Config,
    report: Report,
    fs: Box<dyn FileSystem>,
    runner: Box<dyn ProcessRunner>,
    rng: StdRng,
    /// Names of the files currently being included, innermost last.
    includes: Vec<String>,
}

impl State {
    fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            vars: VarStore::new(),
            config,
            report: Report::new(),
            fs: Box::new(OsFileSystem),
            runner: Box::new(SystemRunner),
            rng,
            includes: Vec::new(),
        }
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// What a directive handler sees while it runs.
pub struct Context<'a> {
    state: &'a mut State,
    registry: &'a Registry,
    out: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    pub fn vars(&self) -> &VarStore {
        &self.state.vars
    }

    pub fn vars_mut(&mut self) -> &mut VarStore {
        &mut self.state.vars
    }

    /// Where markup goes.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.state.fs.as_ref()
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.state.runner.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Run a script stream to its end.
    pub fn run(&mut self, input: &mut dyn BufRead) -> Result<(), CompileError> {
        let mut lines = LineReader::new(input);
        while let Some((line, text)) = lines.next_line()? {
            if text.starts_with('#') {
                continue;
            }
            let rec = parse_line(line, &text, &self.state.vars);
            if rec.is_empty() {
                continue;
            }
            match rec.keyword() {
                "for" => self.run_for(&rec, &mut lines)?,
                "data" => self.run_data(&rec, &mut lines)?,
                _ => self.dispatch(&rec).map_err(CompileError::Write)?,
            }
        }
        Ok(())
    }

    /// Execute one record, collecting any directive failure against its
    /// line.  Only an output failure is returned.
    pub fn dispatch(&mut self, rec: &Record) -> io::Result<()> {
        if self.state.config.trace {
            eprintln!("decksh: trace: line {}: {}", rec.line, rec.tokens.join(" "));
        }
        let result = self.execute(rec);
        self.collect(rec.line, result)
    }

    fn execute(&mut self, rec: &Record) -> Result<(), Fault> {
        let registry = self.registry;
        if let Some(directive) = registry.get(rec.keyword()) {
            return self.run_directive(directive, rec);
        }
        if assign::is_assignment(rec) {
            return assign::assign(rec, &mut self.state.vars, &mut self.state.rng);
        }
        if assign::is_compound(rec) {
            return assign::assign_op(rec, &mut self.state.vars);
        }
        // anything else is not ours to interpret
        Ok(())
    }

    fn run_directive(&mut self, directive: &dyn Directive, rec: &Record) -> Result<(), Fault> {
        if !directive.arity().accepts(rec.len()) {
            return Err(Fault::usage(format!("{} {}", rec.keyword(), directive.usage())));
        }
        directive.run(self, rec)
    }

    /// Record a directive failure at `line`; pass an output failure through.
    fn collect(&mut self, line: usize, result: Result<(), Fault>) -> io::Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Fault::Output(e)) => Err(e),
            Err(Fault::Directive { kind, message }) => {
                self.state.report.push(DirectiveError {
                    line,
                    file: self.state.includes.last().cloned(),
                    kind,
                    message,
                });
                Ok(())
            }
        }
    }

    // ── Block directives ──────────────────────────────────────────────────

    fn run_for(&mut self, header: &Record, lines: &mut LineReader<'_>) -> Result<(), CompileError> {
        let body = looping::read_body(lines, &self.state.vars)?;
        let result = Loop::new(header, body).and_then(|lp| lp.run(self));
        self.collect(header.line, result).map_err(CompileError::Write)
    }

    fn run_data(&mut self, header: &Record, lines: &mut LineReader<'_>) -> Result<(), CompileError> {
        let mut contents = String::new();
        while let Some((_, text)) = lines.next_line()? {
            if text.trim() == "edata" {
                break;
            }
            let fields: Vec<&str> = text.split_whitespace().collect();
            if let [label, value] = fields[..] {
                contents.push_str(label);
                contents.push('\t');
                contents.push_str(value);
                contents.push('\n');
            }
        }
        let result = self.write_data(header, &contents);
        self.collect(header.line, result).map_err(CompileError::Write)
    }

    fn write_data(&mut self, header: &Record, contents: &str) -> Result<(), Fault> {
        if header.len() != 2 {
            return Err(Fault::usage("data \"file\"...edata"));
        }
        let name = file_name(header.arg(1))
            .ok_or_else(|| Fault::usage(format!("{} is not a valid filename", header.arg(1))))?;
        self.fs()
            .write(name, contents)
            .map_err(|e| Fault::resource(format!("{name}: {e}")))
    }

    // ── Include ───────────────────────────────────────────────────────────

    /// Compile the named file in place, sharing variables and output.
    pub fn include(&mut self, name: &str) -> Result<(), Fault> {
        let limit = self.state.config.max_include_depth;
        if self.state.includes.len() >= limit {
            return Err(Fault::new(
                ErrorKind::Resource,
                format!("{name}: include nesting deeper than {limit}"),
            ));
        }
        let source = self
            .fs()
            .read_to_string(name)
            .map_err(|e| Fault::resource(format!("{name}: {e}")))?;

        self.state.includes.push(name.to_owned());
        let mut bytes = source.as_bytes();
        let result = self.run(&mut bytes);
        self.state.includes.pop();

        match result {
            Ok(()) => Ok(()),
            Err(CompileError::Write(e)) => Err(Fault::Output(e)),
            Err(CompileError::Read(e)) => Err(Fault::resource(format!("{name}: {e}"))),
        }
    }
}

// ── Compiler ──────────────────────────────────────────────────────────────────

/// A reusable decksh compiler.
///
/// Variables persist across calls to [`Compiler::compile`]; each call
/// returns the failures collected during that call only.
pub struct Compiler {
    registry: Registry,
    state: State,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler with the standard vocabulary and default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            registry: Registry::standard(),
            state: State::new(config),
        }
    }

    /// Resolve `include`, `data`, `grid` and file loops against `fs`.
    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.state.fs = Box::new(fs);
        self
    }

    /// Run `chart` programs through `runner`.
    pub fn with_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.state.runner = Box::new(runner);
        self
    }

    /// Add (or replace) a keyword.
    pub fn register(&mut self, keyword: impl Into<String>, directive: impl Directive + 'static) {
        self.registry.insert(keyword, directive);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn vars(&self) -> &VarStore {
        &self.state.vars
    }

    pub fn vars_mut(&mut self) -> &mut VarStore {
        &mut self.state.vars
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Failures collected so far by a compilation that was cut short.
    pub fn report(&self) -> &Report {
        &self.state.report
    }

    /// Compile `input` into `out`.
    ///
    /// On success the returned [`Report`] lists every directive failure, in
    /// order.  A read or write failure stops compilation; the failures
    /// collected before it stay available through [`Compiler::report`].
    pub fn compile(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<Report, CompileError> {
        self.state.report = Report::new();
        self.state.includes.clear();
        let mut cx = Context {
            state: &mut self.state,
            registry: &self.registry,
            out,
        };
        cx.run(input)?;
        cx.out().flush().map_err(CompileError::Write)?;
        Ok(std::mem::take(&mut self.state.report))
    }

    /// Compile a script held in memory, returning the markup as text.
    pub fn compile_str(&mut self, source: &str) -> Result<(String, Report), CompileError> {
        let mut out = Vec::new();
        let mut input = source.as_bytes();
        let report = self.compile(&mut input, &mut out)?;
        Ok((String::from_utf8_lossy(&out).into_owned(), report))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFileSystem;

    fn compile(src: &str) -> (String, Report) {
        Compiler::with_config(Config::new().with_seed(1)).compile_str(src).unwrap()
    }

    fn compile_with(fs: MemoryFileSystem, src: &str) -> (String, Report) {
        Compiler::new().with_file_system(fs).compile_str(src).unwrap()
    }

    #[test]
    fn empty_script() {
        let (out, report) = compile("");
        assert_eq!(out, "");
        assert!(report.succeeded());
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let (out, report) = compile("# heading\n\n   \n// note\ndeck\n");
        assert_eq!(out, "<deck>\n");
        assert!(report.succeeded());
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let (out, report) = compile("frobnicate 1 2 3\nedata\nefor\n");
        assert_eq!(out, "");
        assert!(report.succeeded());
    }

    #[test]
    fn assignment_feeds_later_lines() {
        let (out, _) = compile("w = 30\nh = w / 2\nrect 50 50 w h\n");
        assert_eq!(out, "<rect xp=\"50\" yp=\"50\" wp=\"30\" hp=\"15\"/>\n");
    }

    #[test]
    fn usage_errors_are_collected_and_compilation_continues() {
        let (out, report) = compile("canvas 100\ndeck\n");
        assert_eq!(out, "<deck>\n");
        assert_eq!(report.len(), 1);
        let e = &report.errors()[0];
        assert_eq!((e.line, e.kind), (1, ErrorKind::Usage));
        assert_eq!(e.message, "canvas width height");
    }

    #[test]
    fn last_error_is_representative() {
        let (_, report) = compile("canvas 1\nx = 1 / 0\nhline a 10 20\n");
        assert_eq!(report.len(), 3);
        assert_eq!(report.last().map(|e| e.line), Some(3));
    }

    #[test]
    fn numeric_loop() {
        let (out, report) = compile("for i = 1 3\ncircle i 50 5\nefor\n");
        assert!(report.succeeded());
        assert_eq!(
            out,
            "<ellipse xp=\"1\" yp=\"50\" wp=\"5\" hr=\"100\"/>\n\
             <ellipse xp=\"2\" yp=\"50\" wp=\"5\" hr=\"100\"/>\n\
             <ellipse xp=\"3\" yp=\"50\" wp=\"5\" hr=\"100\"/>\n"
        );
    }

    #[test]
    fn list_loop_values_are_quoted() {
        let (out, _) = compile("for c = [red blue]\ncircle 50 50 5 c\nefor\n");
        assert_eq!(
            out,
            "<ellipse xp=\"50\" yp=\"50\" wp=\"5\" hr=\"100\" color=\"red\"/>\n\
             <ellipse xp=\"50\" yp=\"50\" wp=\"5\" hr=\"100\" color=\"blue\"/>\n"
        );
    }

    #[test]
    fn file_loop() {
        let fs = MemoryFileSystem::new().with_file("items.txt", "one\n\ntwo\n");
        let (out, report) = compile_with(fs, "for t = \"items.txt\"\nli t\nefor\n");
        assert!(report.succeeded());
        assert_eq!(out, "<li>one</li>\n<li>two</li>\n");
    }

    #[test]
    fn loop_body_errors_use_body_line_numbers() {
        let (_, report) = compile("for i = 1 2\ncanvas i\nefor\n");
        assert_eq!(report.len(), 2);
        assert!(report.errors().iter().all(|e| e.line == 2));
    }

    #[test]
    fn bad_loop_header_is_reported_at_header() {
        let (out, report) = compile("for i = 1\ndeck\nefor\nedeck\n");
        assert_eq!(out, "</deck>\n");
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].line, 1);
    }

    #[test]
    fn loop_without_efor_runs_to_end() {
        let (out, _) = compile("for i = 1 2\nli\n");
        assert_eq!(out, "<li/>\n<li/>\n");
    }

    #[test]
    fn data_block_writes_two_field_lines() {
        let fs = MemoryFileSystem::new();
        let (out, report) =
            compile_with(fs.clone(), "data \"sales.d\"\nq1 100\nbad line here\nq2 200\n  edata  \ndeck\n");
        assert!(report.succeeded());
        assert_eq!(out, "<deck>\n");
        assert_eq!(fs.contents("sales.d").as_deref(), Some("q1\t100\nq2\t200\n"));
    }

    #[test]
    fn data_block_needs_a_file_name() {
        let (_, report) = compile("data sales\na 1\nedata\n");
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].kind, ErrorKind::Usage);
    }

    #[test]
    fn include_shares_variables() {
        let fs = MemoryFileSystem::new().with_file("defs.dsh", "size = 4\ndeck\n");
        let (out, report) = compile_with(fs, "include \"defs.dsh\"\ncircle 10 10 size\n");
        assert!(report.succeeded());
        assert_eq!(out, "<deck>\n<ellipse xp=\"10\" yp=\"10\" wp=\"4\" hr=\"100\"/>\n");
    }

    #[test]
    fn include_errors_name_the_file() {
        let fs = MemoryFileSystem::new().with_file("inc.dsh", "deck\ncanvas 1\n");
        let (_, report) = compile_with(fs, "include \"inc.dsh\"\n");
        let e = report.last().unwrap();
        assert_eq!(e.file.as_deref(), Some("inc.dsh"));
        assert_eq!(e.line, 2);
    }

    #[test]
    fn missing_include_is_a_resource_error() {
        let (_, report) = compile_with(MemoryFileSystem::new(), "include \"nope.dsh\"\n");
        assert_eq!(report.errors()[0].kind, ErrorKind::Resource);
        assert_eq!(report.errors()[0].file, None);
    }

    #[test]
    fn self_include_hits_the_depth_limit() {
        let fs = MemoryFileSystem::new().with_file("loop.dsh", "include \"loop.dsh\"\n");
        let mut compiler = Compiler::with_config(Config::new().with_max_include_depth(3))
            .with_file_system(fs);
        let (_, report) = compiler.compile_str("include \"loop.dsh\"\n").unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.errors()[0].message.contains("deeper than 3"));
    }

    #[test]
    fn variables_persist_between_compiles() {
        let mut compiler = Compiler::new();
        compiler.compile_str("x = 5\n").unwrap();
        assert_eq!(compiler.vars().get("x"), Some("5"));
        let (out, _) = compiler.compile_str("circle x x x\n").unwrap();
        assert_eq!(out, "<ellipse xp=\"5\" yp=\"5\" wp=\"5\" hr=\"100\"/>\n");
    }

    #[test]
    fn seeded_random_is_repeatable() {
        let src = "r = random 0 100\n";
        let mut a = Compiler::with_config(Config::new().with_seed(9));
        let mut b = Compiler::with_config(Config::new().with_seed(9));
        a.compile_str(src).unwrap();
        b.compile_str(src).unwrap();
        assert_eq!(a.vars().get("r"), b.vars().get("r"));
    }

    #[test]
    fn crlf_lines() {
        let (out, _) = compile("deck\r\nedeck\r\n");
        assert_eq!(out, "<deck>\n</deck>\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_aborts() {
        let mut compiler = Compiler::new();
        let mut input: &[u8] = b"canvas 1\ndeck\n";
        let err = compiler.compile(&mut input, &mut FailingWriter).unwrap_err();
        assert!(matches!(err, CompileError::Write(_)));
        assert_eq!(compiler.report().len(), 1);
    }

    #[test]
    fn invalid_utf8_does_not_stop_compilation() {
        let mut compiler = Compiler::new();
        let mut input: &[u8] = b"deck\ntext \"caf\xe9\" 10 10 2\nedeck\n";
        let mut out = Vec::new();
        let report = compiler.compile(&mut input, &mut out).unwrap();
        assert!(report.succeeded());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<deck>\n<text xp=\"10\" yp=\"10\" sp=\"2\" >caf\u{fffd}</text>\n</deck>\n"
        );
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn read_failure_aborts() {
        let mut input = io::BufReader::new(FailingReader);
        let err = Compiler::new().compile(&mut input, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CompileError::Read(_)));
    }
}
