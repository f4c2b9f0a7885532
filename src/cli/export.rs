//! CLI commands for data export
//!
//! Exports the active user's data; output goes to stdout unless a file is given.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::export::{csv, json, yaml};
use crate::services::UserService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export your transactions to CSV
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all your data to JSON
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Export all your data to YAML
    Yaml {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what an export would contain without writing anything
    Info,
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;

    match cmd {
        ExportCommands::Csv { output } => {
            let writer = open_output(output.as_deref())?;
            let count = csv::export_transactions_csv(storage, &user, &settings.date_format, writer)?;
            if let Some(path) = output {
                println!("Exported {} transactions to: {}", count, path.display());
            }
        }

        ExportCommands::Json { output, compact } => {
            let mut writer = open_output(output.as_deref())?;
            json::export_user_json(storage, &user, &mut writer, !compact)?;
            writer.flush()?;
            match output {
                Some(path) => println!("Data exported to: {}", path.display()),
                None => println!(),
            }
        }

        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_deref())?;
            yaml::export_user_yaml(storage, &user, &mut writer)?;
            writer.flush()?;
            if let Some(path) = output {
                println!("Data exported to: {}", path.display());
            }
        }

        ExportCommands::Info => {
            let export = json::UserExport::from_storage(storage, &user)?;
            println!("Export Information");
            println!("==================");
            println!("Schema version:  {}", export.schema_version);
            println!("User:            {}", export.user.email);
            println!("Transactions:    {}", export.metadata.transaction_count);
            println!("Shared with you: {}", export.shared_with_me.len());
            println!("Receipts:        {}", export.metadata.receipt_count);
            println!("Notifications:   {}", export.metadata.notification_count);
            if let (Some(first), Some(last)) = (
                &export.metadata.earliest_transaction,
                &export.metadata.latest_transaction,
            ) {
                println!("Date range:      {} to {}", first, last);
            }
        }
    }

    Ok(())
}

fn open_output(output: Option<&Path>) -> TallyResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
