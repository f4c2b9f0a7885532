//! Budget CLI commands
//!
//! Monthly spending limits per category, checked after each expense.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_budget_status;
use crate::error::{TallyError, TallyResult};
use crate::models::SummaryPeriod;
use crate::services::{BudgetService, UserService};
use crate::storage::Storage;

use super::{parse_amount, today};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly limit for a category
    Set {
        /// Category name
        category: String,
        /// Monthly limit (e.g., "300.00")
        amount: String,
    },
    /// Remove a category limit
    Remove {
        /// Category name
        category: String,
    },
    /// Show spending against each limit
    Status {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set { category, amount } => {
            let limit = parse_amount(&amount)?;
            service.set_limit(&user, &category, limit)?;
            println!("Monthly budget for {} set to {}", category.trim(), limit);
        }

        BudgetCommands::Remove { category } => {
            service.remove_limit(&user, &category)?;
            println!("Removed budget for {}", category.trim());
        }

        BudgetCommands::Status { month } => {
            let period = match month {
                Some(text) => match SummaryPeriod::parse(&text, settings.week_start()) {
                    Ok(period @ SummaryPeriod::Monthly { .. }) => period,
                    _ => {
                        return Err(TallyError::Validation(format!(
                            "Invalid month '{}'. Use YYYY-MM",
                            text
                        )))
                    }
                },
                None => SummaryPeriod::month_containing(today()),
            };
            println!("Budgets for {}", period.label());
            let statuses = service.status(&user, period.start_date())?;
            print!("{}", format_budget_status(&statuses));
        }
    }

    Ok(())
}
