//! Settings validation command

use std::path::PathBuf;

use clap::{Args, Subcommand};
use hostlink_core::settings::EngineSettings;

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Parse and validate a settings YAML file
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub file: PathBuf,

    /// Print the effective settings, defaults included, as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SettingsArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SettingsCommand::Validate(validate_args) => execute_validate(validate_args),
    }
}

fn execute_validate(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = EngineSettings::from_path(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Settings valid: {}", args.file.display());
    println!("  menu: {}", settings.menu_name());
    println!("  toolbar commands: {}", settings.toolbar_commands.len());
    println!("  startup entries: {}", settings.run_at_startup.len());
    println!(
        "  supported versions: {} to {}",
        settings.minimum_version, settings.last_tested_version
    );
    Ok(())
}
