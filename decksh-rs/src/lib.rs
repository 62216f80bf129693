//! decksh: a little language that generates deck presentation markup.
//!
//! ```rust
//! let (markup, report) = decksh::compile_str("deck\nslide\ntext \"Hi\" 50 50 5\neslide\nedeck\n").unwrap();
//! assert!(report.succeeded());
//! assert!(markup.contains("<text xp=\"50\" yp=\"50\" sp=\"5\" >Hi</text>"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod geometry;
pub mod markup;
pub mod number;
pub mod process;
pub mod script;
pub mod var;

pub use config::Config;
pub use error::{CompileError, DirectiveError, ErrorKind, Fault, Report};
pub use script::{Arity, Builtin, Compiler, Context, Directive, Record, Registry};

/// Compile a script held in memory with a fresh [`Compiler`].
pub fn compile_str(source: &str) -> Result<(String, Report), CompileError> {
    Compiler::new().compile_str(source)
}
