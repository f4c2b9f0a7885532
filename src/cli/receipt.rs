//! Receipt CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_receipt_details, format_receipt_table};
use crate::error::TallyResult;
use crate::services::{ReceiptService, ReceiptTransactionInput, UserService};
use crate::storage::Storage;

use super::{parse_amount, parse_optional_date, parse_optional_kind};

/// Receipt subcommands
#[derive(Subcommand)]
pub enum ReceiptCommands {
    /// Store a receipt image
    Upload {
        /// Image file
        file: PathBuf,
        /// Read the receipt right away
        #[arg(long)]
        process: bool,
    },
    /// Extract merchant, date, total and items from a receipt
    Process {
        /// Receipt ID
        id: String,
    },
    /// Show a receipt and its extracted data
    Show {
        /// Receipt ID
        id: String,
    },
    /// Record a processed receipt as an expense
    Save {
        /// Receipt ID
        id: String,
        /// Override the extracted total
        #[arg(long)]
        amount: Option<String>,
        /// Override the extracted date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Override the merchant as description
        #[arg(short, long)]
        description: Option<String>,
        /// Category; suggested from the merchant when omitted
        #[arg(short, long)]
        category: Option<String>,
        /// Notes; defaults to the item list
        #[arg(short, long)]
        notes: Option<String>,
        /// personal or business
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Attach a receipt to an existing transaction
    Link {
        /// Receipt ID
        id: String,
        /// Transaction ID
        transaction: String,
    },
    /// List your receipts
    List,
    /// Delete a receipt and its stored image
    Delete {
        /// Receipt ID
        id: String,
    },
}

/// Handle a receipt command
pub fn handle_receipt_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReceiptCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let service = ReceiptService::new(storage);

    match cmd {
        ReceiptCommands::Upload { file, process } => {
            let receipt = service.upload(&user, &file)?;
            println!("Uploaded {} as {}", receipt.original_name, receipt.id);
            if process {
                let receipt = service.process(&user, &receipt.id.to_string())?;
                print!("{}", format_receipt_details(&receipt));
            }
        }

        ReceiptCommands::Process { id } => {
            let receipt = service.process(&user, &id)?;
            print!("{}", format_receipt_details(&receipt));
        }

        ReceiptCommands::Show { id } => {
            let receipt = service.get_owned(&user, &id)?;
            print!("{}", format_receipt_details(&receipt));
        }

        ReceiptCommands::Save {
            id,
            amount,
            date,
            description,
            category,
            notes,
            account,
        } => {
            let input = ReceiptTransactionInput {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: parse_optional_date(date.as_deref())?,
                description,
                category,
                notes,
                account_type: parse_optional_kind(account.as_deref())?,
            };
            let (receipt, txn) = service.save_as_transaction(&user, &id, input)?;
            println!(
                "Saved receipt {} as transaction {} ({} {}, {})",
                receipt.id,
                txn.id,
                txn.date,
                txn.amount,
                txn.display_category()
            );
        }

        ReceiptCommands::Link { id, transaction } => {
            let (receipt, txn) = service.link(&user, &id, &transaction)?;
            println!("Linked receipt {} to transaction {}", receipt.id, txn.id);
        }

        ReceiptCommands::List => {
            let receipts = service.list(&user)?;
            print!("{}", format_receipt_table(&receipts));
        }

        ReceiptCommands::Delete { id } => {
            let receipt = service.delete(&user, &id)?;
            println!("Deleted receipt {} ({})", receipt.id, receipt.original_name);
        }
    }

    Ok(())
}
