//! sigil CLI - backslash directive transpiler.
//!
//! Provides commands for:
//! - `transpile`: Transpile a single template
//! - `build`: Transpile every template under a source directory
//! - `sigils`: List the registered sigils

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, SigilsArgs, TranspileArgs};
use output::Output;

/// sigil - Backslash directive transpiler.
#[derive(Parser)]
#[command(name = "sigil", version, about)]
struct Cli {
    /// Enable verbose output (debug logs on stderr).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile a single template.
    Transpile(TranspileArgs),
    /// Transpile all templates under the source directory.
    Build(BuildArgs),
    /// List registered sigils.
    Sigils(SigilsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Transpile(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Sigils(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
