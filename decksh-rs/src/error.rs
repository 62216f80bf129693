//! Error types.
//!
//! Compilation is best-effort: a directive that fails produces a
//! [`DirectiveError`] which is collected into the [`Report`] while the
//! compiler moves on to the next line.  Only failures of the script stream
//! itself (reading the input, writing the output) stop compilation; those
//! surface as [`CompileError`].

use std::fmt;
use std::io;

// ── Error kinds ───────────────────────────────────────────────────────────────

/// What class of problem a directive ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong number or shape of arguments.
    Usage,
    /// An argument that must be a number is not.
    Number,
    /// Arithmetic that cannot be carried out (division by zero).
    Arithmetic,
    /// A file could not be opened, read or created.
    Resource,
    /// An external program could not be run or failed.
    Process,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Usage => "usage",
            ErrorKind::Number => "number",
            ErrorKind::Arithmetic => "arithmetic",
            ErrorKind::Resource => "resource",
            ErrorKind::Process => "process",
        })
    }
}

// ── Fault ─────────────────────────────────────────────────────────────────────

/// Failure returned by a directive handler.
#[derive(Debug)]
pub enum Fault {
    /// The directive failed; compilation continues with the next line.
    Directive { kind: ErrorKind, message: String },
    /// Writing markup failed; compilation stops.
    Output(io::Error),
}

impl Fault {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Fault::Directive { kind, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    /// `token` was expected to be a number.
    pub fn not_a_number(token: &str) -> Self {
        Self::new(ErrorKind::Number, format!("{token} is not a number"))
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, message)
    }
}

impl From<io::Error> for Fault {
    fn from(e: io::Error) -> Self {
        Fault::Output(e)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Directive { message, .. } => f.write_str(message),
            Fault::Output(e) => write!(f, "write error: {e}"),
        }
    }
}

impl std::error::Error for Fault {}

// ── DirectiveError ────────────────────────────────────────────────────────────

/// One collected directive failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveError {
    /// 1-based line number in the script the directive came from.
    pub line: usize,
    /// Name of the included file the line belongs to; `None` for the
    /// top-level script.
    pub file: Option<String>,
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for DirectiveError {}

// ── Report ────────────────────────────────────────────────────────────────────

/// Outcome of a compilation that ran to the end of its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    errors: Vec<DirectiveError>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: DirectiveError) {
        self.errors.push(error);
    }

    /// All failures, in the order they were encountered.
    pub fn errors(&self) -> &[DirectiveError] {
        &self.errors
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// The representative failure: the last one collected.
    pub fn last(&self) -> Option<&DirectiveError> {
        self.errors.last()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `Result` carrying the representative failure.
    pub fn into_result(mut self) -> Result<(), DirectiveError> {
        match self.errors.pop() {
            Some(last) => Err(last),
            None => Ok(()),
        }
    }
}

// ── CompileError ──────────────────────────────────────────────────────────────

/// A failure that aborts compilation.
#[derive(Debug)]
pub enum CompileError {
    /// The script could not be read.
    Read(io::Error),
    /// The markup could not be written.
    Write(io::Error),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Read(e) => write!(f, "read error: {e}"),
            CompileError::Write(e) => write!(f, "write error: {e}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Read(e) | CompileError::Write(e) => Some(e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
