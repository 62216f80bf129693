//! The decksh language.
//!
//! A script is a sequence of lines, one directive per line:
//!
//! - keyword directives (`slide`, `text`, `circle`, …) write deck markup;
//! - assignments (`x = 10`, `y = x * 2`, `n += 1`) define variables, which
//!   are substituted into every later line;
//! - block directives (`for … efor`, `data … edata`) consume the lines that
//!   follow them;
//! - lines starting with `#`, blank lines, and `//` or `/* */` comments are
//!   skipped.
//!
//! # Quick start
//!
//! ```rust
//! use decksh::script::Compiler;
//!
//! let mut compiler = Compiler::new();
//! let (markup, report) = compiler.compile_str("x = 6\ny = x * 7\ncircle y y 5\n").unwrap();
//! assert!(report.succeeded());
//! assert_eq!(markup, "<ellipse xp=\"42\" yp=\"42\" wp=\"5\" hr=\"100\"/>\n");
//! ```

pub mod assign;
pub mod builtins;
pub mod interp;
pub mod looping;
pub mod registry;
pub mod scan;

// Re-exports for convenience.
pub use interp::{Compiler, Context};
pub use registry::{Arity, Builtin, Directive, Registry};
pub use scan::Record;
