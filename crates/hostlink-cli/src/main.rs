//! hostlink CLI
//!
//! Offline checks for the host integration: version normalization, launcher
//! support and settings validation

use clap::{Parser, Subcommand};
use hostlink_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hostlink")]
#[command(about = "hostlink - Host integration tooling", long_about = None)]
struct Cli {
    /// Print debug logs
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Host version operations
    Version(commands::version::VersionArgs),
    /// Settings file operations
    Settings(commands::settings::SettingsArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Version(args) => commands::version::execute(args),
        Commands::Settings(args) => commands::settings::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
