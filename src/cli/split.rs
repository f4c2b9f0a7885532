//! Shared-expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_share_breakdown, format_split_summary, format_split_table, SplitRow};
use crate::error::TallyResult;
use crate::services::{share_breakdown, SplitService, SplitView, TransactionService, UserService};
use crate::storage::Storage;

use super::parse_kind;

/// Split subcommands
#[derive(Subcommand)]
pub enum SplitCommands {
    /// List shared expenses
    List {
        /// all, i-owe, owed-to-me or settled
        #[arg(short, long, default_value = "all")]
        view: String,
    },
    /// Show what you owe and are owed
    Summary,
    /// Mark your share of a shared expense as paid
    Pay {
        /// Transaction ID
        id: String,
    },
    /// Remind participants of an expense you paid
    Remind {
        /// Transaction ID
        id: String,
        /// Custom reminder text
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Notify yourself about the expenses you still owe on
    RemindPending,
    /// Show how a shared expense is split
    Shares {
        /// Transaction ID
        id: String,
    },
}

/// Handle a split command
pub fn handle_split_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SplitCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let service = SplitService::new(storage);

    match cmd {
        SplitCommands::List { view } => {
            let view: SplitView = parse_kind(&view)?;
            let transactions = service.list(&user, view)?;
            let rows = transactions
                .iter()
                .map(|txn| Ok(SplitRow::new(txn, &user, &service.payer_name(txn)?)))
                .collect::<TallyResult<Vec<_>>>()?;
            print!("{}", format_split_table(&rows));
        }

        SplitCommands::Summary => {
            let summary = service.summary(&user)?;
            print!("{}", format_split_summary(&summary));
        }

        SplitCommands::Pay { id } => {
            let txn = service.mark_paid(&user, &id)?;
            println!("Marked {} as paid.", txn.id);
        }

        SplitCommands::Remind { id, message } => {
            let notified = service.send_reminder(&user, &id, message.as_deref())?;
            if notified == 0 {
                println!("No participant has a local profile; nobody was notified.");
            } else {
                println!("Reminder sent to {} participant(s).", notified);
            }
        }

        SplitCommands::RemindPending => match service.remind_pending(&user)? {
            Some(notification) => println!("{}", notification.message),
            None => println!("Nothing pending. You are all settled up."),
        },

        SplitCommands::Shares { id } => {
            let txn = TransactionService::new(storage).get_visible(&user, &id)?;
            let payer = service.payer_name(&txn)?;
            print!("{}", format_share_breakdown(&txn, &share_breakdown(&txn, &payer)));
        }
    }

    Ok(())
}
