//! PlaceDesk command line front end
//!
//! Hosts the table engine outside a browser: hydrate table state from a
//! location query and show what would be fetched, or export a row dump the
//! way the table's download button does.

mod commands;
mod logging;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{ExportArgs, InspectArgs};
use crate::logging::LoggingConfig;
use crate::settings::{Settings, resolve_settings_file};

#[derive(Debug, Parser)]
#[command(name = "placedesk", version, about = "Filterable data table tooling")]
struct Cli {
    /// Settings file; defaults to the platform config directory
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_filter: Option<String>,

    /// Also write JSON logs to the log directory
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a location query into table state, filter tree and request URL
    Inspect(InspectArgs),
    /// Export rows to an xlsx file
    Export(ExportArgs),
    /// Print the effective settings
    Settings(SettingsArgs),
}

#[derive(Debug, clap::Args)]
struct SettingsArgs {
    /// Save the effective settings to the settings file
    #[arg(long)]
    write: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = resolve_settings_file(cli.settings.as_deref())?;
    let mut settings = Settings::load_from(&settings_path)?;
    if let Some(filter) = &cli.log_filter {
        settings.log_filter = filter.clone();
    }
    if cli.json_logs {
        settings.json_logs = true;
    }

    let _guard = logging::init(LoggingConfig::from_settings(&settings))?;

    match &cli.command {
        Command::Inspect(args) => {
            let report = commands::inspect(args, &settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Export(args) => {
            let path = commands::export(args, &settings)?;
            println!("{}", path.display());
        }
        Command::Settings(args) if args.write => {
            settings.save_to(&settings_path)?;
            println!("{}", settings_path.display());
        }
        Command::Settings(_) => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
