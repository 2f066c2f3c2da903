//! rowcast: encode JSON records as CSV
//!
//! The first record decides the columns: nested objects become `Parent.Child`
//! columns and arrays become `Name[0]`, `Name[1]`, ... blocks as wide as the
//! first record's array. Later records are laid out in those columns.
//!
//! ## Example Usage
//!
//! ```bash
//! # JSON array file to stdout
//! rowcast encode --input people.json
//!
//! # JSON Lines from stdin, semicolon separated, no header
//! cat events.jsonl | rowcast encode --input - --format jsonl --delimiter ';' --no-header
//!
//! # Show the inferred columns and their resolution paths
//! rowcast columns --input people.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod rowcast_cli;

use rowcast_cli::{columns::ColumnsCmd, encode::EncodeCmd};

#[derive(Parser)]
#[command(
    name = "rowcast",
    author,
    version,
    about = "Encode JSON records as delimited rows",
    long_about = "Encode JSON arrays or JSON Lines as CSV.\n\n\
                  Nested objects and arrays are flattened into columns inferred from the first record."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode records into rows
    Encode(EncodeCmd),

    /// Print the columns inferred from the first record
    Columns(ColumnsCmd),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let Cli { command, verbose } = Cli::parse();
    init_logging(verbose);

    match command {
        Commands::Encode(cmd) => cmd.execute(),
        Commands::Columns(cmd) => cmd.execute(),
    }
}
