//! HEXSGF CLI - Command-line tools for Hex game records
//!
//! Commands:
//! - check: Validate records and report warnings
//! - rewrite: Normalize a record through the writer
//! - mainline: Print the main line of a record

mod check_cmd;
mod input;
mod mainline_cmd;
mod rewrite_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexsgf")]
#[command(about = "Read, check and rewrite Hex game records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse records and report errors and warnings
    Check(check_cmd::CheckArgs),
    /// Parse a record and write it back out
    Rewrite(rewrite_cmd::RewriteArgs),
    /// Print the main line of a record
    Mainline(mainline_cmd::MainlineArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check_cmd::run(args),
        Commands::Rewrite(args) => rewrite_cmd::run(args),
        Commands::Mainline(args) => mainline_cmd::run(args),
    }
}
