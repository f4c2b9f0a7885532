//! Configuration CLI commands

use chrono::format::{Item, StrftimeItems};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::AccountType;
use crate::storage::Storage;

use super::parse_kind;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration and paths
    Show,
    /// Change one or more settings
    Set {
        /// Currency symbol
        #[arg(long)]
        currency: Option<String>,
        /// Date format (strftime, e.g. "%d/%m/%Y")
        #[arg(long)]
        date_format: Option<String>,
        /// First day of the week (sunday or monday)
        #[arg(long)]
        week_start: Option<String>,
        /// Account type for new transactions (personal or business)
        #[arg(long)]
        account: Option<String>,
        /// Number of recent searches to remember
        #[arg(long)]
        recent_searches: Option<usize>,
    },
}

/// Handle a config command
pub fn handle_config_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> TallyResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            let paths = storage.paths();
            println!("TallyCLI Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Uploads:          {}", paths.uploads_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Week starts on:       {}", settings.week_start());
            println!("  Default account type: {}", settings.default_account_type);
            println!("  Recent searches kept: {}", settings.recent_search_limit);
            match settings.current_user {
                Some(id) => println!("  Active user:          {}", id),
                None => println!("  Active user:          (none)"),
            }
        }

        ConfigCommands::Set {
            currency,
            date_format,
            week_start,
            account,
            recent_searches,
        } => {
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if let Some(format) = date_format {
                let invalid = StrftimeItems::new(&format).any(|item| matches!(item, Item::Error));
                if invalid {
                    return Err(TallyError::Validation(format!(
                        "Invalid date format '{}'",
                        format
                    )));
                }
                settings.date_format = format;
            }
            if let Some(day) = week_start {
                settings.first_day_of_week = match day.trim().to_lowercase().as_str() {
                    "sunday" | "sun" => 0,
                    "monday" | "mon" => 1,
                    _ => {
                        return Err(TallyError::Validation(format!(
                            "Invalid week start '{}'. Expected one of: sunday, monday",
                            day
                        )))
                    }
                };
            }
            if let Some(account) = account {
                settings.default_account_type = parse_kind::<AccountType>(&account)?;
            }
            if let Some(limit) = recent_searches {
                settings.recent_search_limit = limit;
            }

            settings.save(storage.paths())?;
            println!("Settings saved.");
        }
    }

    Ok(())
}
