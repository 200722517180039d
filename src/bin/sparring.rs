//! Sparring CLI - Combat stimulus engine for reaction-time experiments
//!
//! This CLI provides a unified interface for:
//! - Running an interactive session at the terminal
//! - Simulating participants to exercise the rule table
//! - Inspecting the transition rules

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sparring")]
#[command(version, about = "Combat stimulus engine for reaction-time experiments", long_about = None)]
struct Cli {
    /// Log debug output (twice for trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session at the terminal
    Run(sparring::cli::commands::run::RunArgs),

    /// Simulate sessions with a random participant
    Simulate(sparring::cli::commands::simulate::SimulateArgs),

    /// Print the transition rule table
    Table(sparring::cli::commands::table::TableArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => sparring::cli::commands::run::execute(args),
        Commands::Simulate(args) => sparring::cli::commands::simulate::execute(args),
        Commands::Table(args) => sparring::cli::commands::table::execute(args),
    }
}
