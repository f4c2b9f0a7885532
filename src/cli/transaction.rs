//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{TallyError, TallyResult};
use crate::models::{AccountType, PaymentStatus, TransactionType};
use crate::services::{
    CreateTransactionInput, SplitService, TransactionFilter, TransactionService,
    UpdateTransactionInput, UserService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_kind, parse_optional_date, parse_optional_kind, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// income or expense
        #[arg(value_name = "TYPE")]
        transaction_type: String,
        /// Amount (e.g., "42.50")
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
        /// personal or business, defaults to the configured account type
        #[arg(short, long)]
        account: Option<String>,
        /// Emails or user IDs to split the expense with (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        shared_with: Vec<String>,
        /// Initial payment status (pending, paid, completed)
        #[arg(long)]
        status: Option<String>,
        /// Audio file to attach as a voice note
        #[arg(long)]
        voice_note: Option<PathBuf>,
        /// Suggest a category from the description when none is given
        #[arg(long)]
        auto_categorize: bool,
    },
    /// List transactions
    List {
        /// Filter by type (income or expense)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// Filter by category name
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by account type
        #[arg(short, long)]
        account: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only shared transactions
        #[arg(long)]
        shared: bool,
        /// Filter by payment status (pending, paid, completed)
        #[arg(long)]
        status: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New type
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New date
        #[arg(long)]
        date: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
        /// New account type
        #[arg(short, long)]
        account: Option<String>,
        /// Replace the participants (comma separated)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "unshare")]
        shared_with: Option<Vec<String>>,
        /// Stop sharing the transaction
        #[arg(long)]
        unshare: bool,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            transaction_type,
            amount,
            category,
            description,
            date,
            notes,
            account,
            shared_with,
            status,
            voice_note,
            auto_categorize,
        } => {
            let input = CreateTransactionInput {
                transaction_type: parse_kind(&transaction_type)?,
                amount: parse_amount(&amount)?,
                date: match date {
                    Some(date) => parse_date(&date)?,
                    None => today(),
                },
                category,
                description,
                notes,
                account_type: Some(
                    parse_optional_kind::<AccountType>(account.as_deref())?
                        .unwrap_or(settings.default_account_type),
                ),
                shared_with,
                payment_status: parse_optional_kind(status.as_deref())?,
                voice_note,
                auto_categorize,
            };

            let txn = service.create(&user, input)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Type:     {}", txn.transaction_type);
            println!("  Date:     {}", txn.date.format(&settings.date_format));
            println!("  Amount:   {}", txn.amount.format_with_symbol(&settings.currency_symbol));
            println!("  Category: {}", txn.display_category());
            println!("  Account:  {}", txn.account_type);
            if txn.is_shared {
                println!(
                    "  Shared:   {} ({} each)",
                    txn.shared_with.join(", "),
                    txn.payer_share()
                );
            }
            if txn.voice_note.is_some() {
                println!("  Voice note attached");
            }
        }

        TransactionCommands::List {
            transaction_type,
            category,
            account,
            from,
            to,
            shared,
            status,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(kind) = parse_optional_kind::<TransactionType>(transaction_type.as_deref())? {
                filter = filter.transaction_type(kind);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(account) = parse_optional_kind::<AccountType>(account.as_deref())? {
                filter = filter.account_type(account);
            }
            filter.start_date = parse_optional_date(from.as_deref())?;
            filter.end_date = parse_optional_date(to.as_deref())?;
            if shared {
                filter = filter.shared(true);
            }
            if let Some(status) = parse_optional_kind::<PaymentStatus>(status.as_deref())? {
                filter = filter.payment_status(status);
            }

            let transactions = service.list(&user, &filter)?;
            print!("{}", format_transaction_table(&transactions, &settings.date_format));
            if !transactions.is_empty() {
                println!("{} transaction(s)", transactions.len());
            }
        }

        TransactionCommands::Show { id } => {
            let txn = service.get_visible(&user, &id)?;
            let payer = SplitService::new(storage).payer_name(&txn)?;
            let receipt = match txn.receipt_id {
                Some(receipt_id) => storage.receipts.get(receipt_id)?,
                None => None,
            };
            print!("{}", format_transaction_details(&txn, &payer, receipt.as_ref()));
        }

        TransactionCommands::Edit {
            id,
            transaction_type,
            amount,
            category,
            description,
            date,
            notes,
            account,
            shared_with,
            unshare,
        } => {
            let input = UpdateTransactionInput {
                transaction_type: parse_optional_kind(transaction_type.as_deref())?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: parse_optional_date(date.as_deref())?,
                category,
                description,
                notes,
                account_type: parse_optional_kind(account.as_deref())?,
                shared_with: if unshare { Some(Vec::new()) } else { shared_with },
            };
            if input.is_empty() {
                return Err(TallyError::Validation(
                    "Nothing to change. Pass at least one field to edit".into(),
                ));
            }

            let txn = service.update(&user, &id, input)?;
            println!("Updated transaction {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(&user, &id)?;
            println!(
                "Deleted transaction {} ({} {})",
                txn.id,
                txn.date,
                txn.amount.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}
