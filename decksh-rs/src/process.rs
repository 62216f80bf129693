//! External program execution for the `chart`/`dchart` directives.
//!
//! The chart program is run directly (no shell), with arguments already
//! split, and the compiler blocks until it exits.  There is no timeout: a
//! program that never exits stalls the compilation.  [`ProcessRunner`] is
//! the seam tests use to substitute canned output.

use std::process::{Command, Stdio};

/// Runs a program and captures its standard output.
pub trait ProcessRunner {
    /// Run `argv[0]` with arguments `argv[1..]`.
    ///
    /// Returns the captured stdout on a zero exit status, otherwise a
    /// description of what went wrong.
    fn run(&self, argv: &[String]) -> Result<Vec<u8>, String>;
}

/// Spawns real processes, looking the program up on `PATH` when it is a
/// bare name.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String]) -> Result<Vec<u8>, String> {
        let (program, args) = argv.split_first().ok_or_else(|| "empty command".to_owned())?;
        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("{program} - {e}"))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let detail = stderr.lines().next().unwrap_or("").trim();
            return Err(if detail.is_empty() {
                out.status.to_string()
            } else {
                format!("{} ({detail})", out.status)
            });
        }
        Ok(out.stdout)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
