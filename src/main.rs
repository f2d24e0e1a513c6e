//! tinyawk command-line entry point.
//!
//! Usage:
//!   tinyawk 'program' [file]
//!   tinyawk -f progfile [file]

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser as _;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tinyawk::Interpreter;

/// A small AWK interpreter
#[derive(clap::Parser, Debug)]
#[command(name = "tinyawk", version, about, long_about = None)]
struct Args {
    /// Read the program from a file instead of the first operand
    #[arg(short = 'f', long = "file", value_name = "PROGFILE")]
    progfile: Option<PathBuf>,

    /// Set the field separator before BEGIN runs
    #[arg(short = 'F', long = "field-separator", value_name = "FS")]
    field_separator: Option<String>,

    /// Assign a variable before BEGIN runs (repeatable)
    #[arg(short = 'v', long = "assign", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Reject programs longer than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_script_bytes: Option<usize>,

    /// Reject input longer than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_input_bytes: Option<usize>,

    /// Program text (unless -f is given), then an optional input file ("-" for stdin)
    #[arg(value_name = "ARGS")]
    operands: Vec<String>,
}

fn main() -> ExitCode {
    // Silent unless RUST_LOG asks for something
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "tinyawk failed");
            eprintln!("tinyawk: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut operands = args.operands.into_iter();

    let script = match &args.progfile {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read program file {}", path.display()))?,
        None => operands.next().context("no program provided")?,
    };
    let input_path = operands.next();
    if let Some(extra) = operands.next() {
        bail!("unexpected extra operand '{extra}': only one input file is supported");
    }

    if script.trim().is_empty() {
        bail!("program is empty");
    }
    if let Some(limit) = args.max_script_bytes
        && script.len() > limit
    {
        bail!("program is {} bytes, limit is {limit}", script.len());
    }

    let input = match input_path.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read standard input")?;
            buf
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read input file {path}"))?,
    };
    if let Some(limit) = args.max_input_bytes
        && input.len() > limit
    {
        bail!("input is {} bytes, limit is {limit}", input.len());
    }

    let mut interpreter = Interpreter::from_script(&script).context("invalid program")?;

    if let Some(fs) = &args.field_separator {
        interpreter.set_fs(fs);
    }
    for (name, value) in &args.assignments {
        interpreter.set_variable(name, value);
    }

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let result = interpreter.run(&input, &mut output);
    // Keep whatever was printed before a runtime error
    output.flush().context("failed to write output")?;
    result.context("runtime error")?;

    Ok(())
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid variable assignment '{s}', expected NAME=VALUE"))?;

    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!("invalid variable name '{name}'"));
    }

    Ok((name.to_string(), value.to_string()))
}
