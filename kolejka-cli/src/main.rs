//! Kolejka CLI - Command-line interface
//!
//! This binary provides a command-line interface to the kolejka library.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod output;
mod runner;

use commands::{benefits, regions, search};

#[derive(Parser)]
#[command(name = "kolejka")]
#[command(version = kolejka::VERSION)]
#[command(about = "Aggregate public medical queue listings across voivodeships", long_about = None)]
struct Cli {
    /// Enable debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover surrounding regions and aggregate queue listings for a benefit
    Search(search::SearchArgs),
    /// Look up benefit names matching a fragment
    Benefits(benefits::BenefitsArgs),
    /// Print the voivodeship code table
    Regions,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search(args) => search::run(args, cli.verbose).await,
        Commands::Benefits(args) => benefits::run(args, cli.verbose).await,
        Commands::Regions => regions::run(),
    };

    if let Err(error) = result {
        error.exit();
    }
}
