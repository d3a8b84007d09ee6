//! # Fiddle
//!
//! Command line entry point.

use clap::Parser;
use fiddle::lang::{Config, Error, ParseMode, Source};
use fiddle::mach::Runtime;
use fiddle::term;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fiddle", version, about = "Run a Fiddle program")]
struct Args {
    /// Comma separated values to start with, the first ends on top
    #[arg(short, long, value_name = "LIST")]
    stack: Option<String>,

    /// Run this text instead of a file
    #[arg(short, long, value_name = "STR", conflicts_with_all = ["interactive", "unicode", "bytes"])]
    commands: Option<String>,

    /// Apply one line at a time
    #[arg(short, long, conflicts_with_all = ["unicode", "bytes"])]
    interactive: bool,

    /// Realize non-terminating literals as floats
    #[arg(short, long, overrides_with = "rational")]
    float: bool,

    /// Realize non-terminating literals as rationals (default)
    #[arg(short, long, overrides_with = "float")]
    rational: bool,

    /// Read the program file as UTF-8 text
    #[arg(short, long, conflicts_with = "bytes")]
    unicode: bool,

    /// Read the program file as code page bytes (default for files)
    #[arg(short, long)]
    bytes: bool,

    /// Program file
    file: Option<PathBuf>,

    /// Arguments passed along with the program
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FIDDLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let parse_mode = if args.float {
        ParseMode::Float
    } else {
        ParseMode::Rational
    };
    let mut runtime = Runtime::new(Config::new(parse_mode));
    if let Some(items) = &args.stack {
        runtime.preload(items)?;
    }
    tracing::debug!(?args, "starting");
    if let Some(commands) = &args.commands {
        return term::batch(&mut runtime, Source::Text(commands));
    }
    match &args.file {
        Some(path) if args.unicode => {
            let text = std::fs::read_to_string(path)?;
            term::batch(&mut runtime, Source::Text(&text))
        }
        Some(path) => {
            let bytes = std::fs::read(path)?;
            term::batch(&mut runtime, Source::Bytes(&bytes))
        }
        None if args.interactive || std::io::stdin().is_terminal() => {
            Ok(term::interactive(runtime)?)
        }
        None => {
            let mut bytes = vec![];
            std::io::stdin().read_to_end(&mut bytes)?;
            if args.bytes {
                term::batch(&mut runtime, Source::Bytes(&bytes))
            } else {
                let text = String::from_utf8(bytes)
                    .map_err(|e| fiddle::error!(IoError; &e.to_string()))?;
                term::batch(&mut runtime, Source::Text(&text))
            }
        }
    }
}
