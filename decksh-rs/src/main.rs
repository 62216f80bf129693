use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process;

use decksh::cli::{self, CliArgs};
use decksh::{Compiler, Config, Report};

// Exit statuses.
const EXIT_INPUT: i32 = 1;
const EXIT_OUTPUT: i32 = 2;
const EXIT_DIRECTIVES: i32 = 3;
const EXIT_STREAM: i32 = 4;
const EXIT_USAGE: i32 = 64;

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) if e.use_stderr() => {
            eprint!("{e}");
            process::exit(EXIT_USAGE);
        }
        // --help, --version
        Err(e) => e.exit(),
    };

    let config = match Config::from_env() {
        Ok(c) => args.apply(c),
        Err(e) => {
            eprintln!("decksh: {e}");
            process::exit(EXIT_USAGE);
        }
    };

    process::exit(run(&args, config));
}

fn run(args: &CliArgs, config: Config) -> i32 {
    let mut input: Box<dyn io::BufRead> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("decksh: {}: {e}", path.display());
                return EXIT_INPUT;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("decksh: {}: {e}", path.display());
                return EXIT_OUTPUT;
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut compiler = Compiler::with_config(config);
    match compiler.compile(&mut input, &mut output) {
        Ok(report) => {
            print_report(&report);
            if report.succeeded() {
                0
            } else {
                EXIT_DIRECTIVES
            }
        }
        Err(e) => {
            print_report(compiler.report());
            eprintln!("decksh: {e}");
            EXIT_STREAM
        }
    }
}

/// Every collected failure in order, then the last one again as the
/// final status line.
fn print_report(report: &Report) {
    for e in report.errors() {
        eprintln!("decksh: {e}");
    }
    if let Some(last) = report.last() {
        eprintln!("decksh: {} error(s); last: {last}", report.len());
    }
}
