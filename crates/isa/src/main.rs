//! ISA CLI - structured-data contributions to Wikimedia Commons.
//!
//! Provides commands for:
//! - `serve`: Start the contribution API server
//! - `submit`: Submit a batch of edit intents from a JSON file
//! - `rejected`: List depict suggestions a user rejected for a file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RejectedArgs, ServeArgs, SubmitArgs};
use error::CliError;
use output::Output;

/// ISA - structured-data contributions to Wikimedia Commons.
#[derive(Parser)]
#[command(name = "isa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the contribution API server.
    Serve(ServeArgs),
    /// Submit a batch of edit intents.
    Submit(SubmitArgs),
    /// List rejected depict suggestions for a file.
    Rejected(RejectedArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Serve(args) => args.verbose,
            Self::Submit(args) => args.verbose,
            Self::Rejected(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let rt = tokio::runtime::Runtime::new()?;
    match command {
        Commands::Serve(args) => rt.block_on(args.execute()),
        Commands::Submit(args) => rt.block_on(args.execute()),
        Commands::Rejected(args) => rt.block_on(args.execute()),
    }
}
