//! `json-api` — convert between JSON:API documents and flat JSON.
//!
//! Usage:
//!   json-api decode [--include <list>] [--parse-not-included] [--key-path <path>]
//!   json-api encode [--meta-in-common-namespace] [--additional '<json-object>']
//!
//! The document is read from stdin and the result is written to stdout.
//! Set `RUST_LOG=json_api=debug` to see what the codec is doing.

mod cli;

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use json_api::{DecoderOptions, EncoderOptions};
use tracing_subscriber::EnvFilter;

use crate::cli::{decode_document, encode_document, CliError};

#[derive(Debug, Parser)]
#[command(name = "json-api", version, about = "Convert between JSON:API documents and flat JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Flatten a JSON:API document read from stdin.
    Decode(DecodeArgs),
    /// Encode flat JSON read from stdin as a JSON:API document.
    Encode(EncodeArgs),
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Comma separated relationship paths to resolve, e.g. `author,comments.author`.
    /// Without it every reachable relationship is resolved.
    #[arg(long)]
    include: Option<String>,
    /// Emit `{type, id}` for relationships that are not resolved.
    #[arg(long)]
    parse_not_included: bool,
    /// Print only the value at this dotted key path, e.g. `data`.
    #[arg(long)]
    key_path: Option<String>,
    /// Print compact JSON.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Treat `meta` as a resource-level member instead of an attribute.
    #[arg(long)]
    meta_in_common_namespace: bool,
    /// JSON object with extra top-level fields, e.g. `{"meta": {...}}`.
    #[arg(long)]
    additional: Option<String>,
    /// Print compact JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    tracing::debug!(bytes = input.len(), command = ?cli.command, "read document from stdin");

    let output = match cli.command {
        Command::Decode(args) => decode_document(
            &input,
            args.include.as_deref(),
            args.key_path.as_deref(),
            &DecoderOptions::new(args.parse_not_included),
            !args.compact,
        )?,
        Command::Encode(args) => encode_document(
            &input,
            args.additional.as_deref(),
            &EncoderOptions::new(args.meta_in_common_namespace),
            !args.compact,
        )?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
