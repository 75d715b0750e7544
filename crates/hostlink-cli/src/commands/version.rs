//! Version normalize and launcher check commands

use clap::{Args, Subcommand};
use hostlink_core::launcher::{LauncherPolicy, Support};
use hostlink_core::version::{normalize, Component};

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Print the comparable components of a raw host version
    Normalize(NormalizeArgs),
    /// Check whether an executable version may be launched
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Raw version string, e.g. "2018.3.1" or "6.2"
    pub raw: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Raw version of the executable
    pub raw: String,

    /// Minimum supported raw version
    #[arg(long)]
    pub minimum: Option<String>,

    /// Allowed raw version; repeatable, none allows every version
    #[arg(long = "allow")]
    pub allow: Vec<String>,

    /// Executable name used in messages
    #[arg(long, default_value = "host")]
    pub executable: String,
}

pub fn execute(args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        VersionCommand::Normalize(normalize_args) => execute_normalize(normalize_args),
        VersionCommand::Check(check_args) => execute_check(check_args),
    }
}

fn execute_normalize(args: NormalizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let value = normalize(&args.raw)?;
    let rendered: Vec<String> = value
        .components()
        .iter()
        .map(|component| match component {
            Component::Number(n) => n.to_string(),
            Component::Text(text) => format!("{:?}", text),
        })
        .collect();
    println!("[{}]", rendered.join(", "));
    Ok(())
}

fn execute_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy = LauncherPolicy::new(args.minimum, args.allow);
    match policy.check(&args.executable, &args.raw) {
        Support::Supported => {
            println!("{} {} is supported", args.executable, args.raw);
            Ok(())
        }
        Support::Unsupported { reason } => Err(reason.into()),
    }
}
