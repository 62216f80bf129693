//! Compile options.
//!
//! | Setting | Environment | Flag | Default |
//! |---------|-------------|------|---------|
//! | random seed | `DECKSH_SEED` | `--seed <n>` | OS entropy |
//! | directive trace | `DECKSH_TRACE` | `--trace` | off |
//! | include depth | - | - | 32 |
//!
//! Flags override the environment.

/// Default limit on nested `include` directives.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// An environment setting that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.var, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Options for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seed for `random` assignments; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Echo every dispatched directive to stderr.
    pub trace: bool,
    /// How deeply `include` may nest before it is refused.
    pub max_include_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            trace: false,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `DECKSH_SEED` and `DECKSH_TRACE` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (exposed for testing).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::new();

        if let Some(raw) = lookup("DECKSH_SEED") {
            let seed = raw.trim().parse::<u64>().map_err(|_| ConfigError {
                var: "DECKSH_SEED",
                message: format!("invalid seed: {raw}"),
            })?;
            config.seed = Some(seed);
        }

        if let Some(raw) = lookup("DECKSH_TRACE") {
            config.trace = match raw.trim() {
                "" | "0" | "false" | "no" | "off" => false,
                "1" | "true" | "yes" | "on" => true,
                _ => {
                    return Err(ConfigError {
                        var: "DECKSH_TRACE",
                        message: format!("expected a boolean, got {raw}"),
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
