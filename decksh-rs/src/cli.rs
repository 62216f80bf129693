//! Command-line argument parsing.
//!
//! Usage:
//!   decksh [-o <output>] [--seed <n>] [--trace] [<input>]
//!
//! Without `<input>` the script is read from stdin; without `-o` markup goes
//! to stdout.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(name = "decksh", version, about = "Compile decksh scripts into deck markup")]
pub struct CliArgs {
    /// Script to compile (default: stdin)
    pub input: Option<PathBuf>,

    /// Write markup to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seed for `random` assignments (overrides DECKSH_SEED)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Echo each directive to stderr as it runs
    #[arg(long)]
    pub trace: bool,
}

impl CliArgs {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: Config) -> Config {
        let config = match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        };
        if self.trace {
            config.with_trace(true)
        } else {
            config
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse a slice of argument strings, not including the program name
/// (exposed for testing).
pub fn parse_argv(argv: &[&str]) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(std::iter::once("decksh").chain(argv.iter().copied()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
