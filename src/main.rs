use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally_cli::cli::{
    handle_audit_command, handle_budget_command, handle_config_command, handle_dashboard_command,
    handle_export_command, handle_notify_command, handle_receipt_command, handle_report_command,
    handle_search_command, handle_split_command, handle_subscription_command,
    handle_transaction_command, handle_user_command,
};
use tally_cli::config::{paths::TallyPaths, settings::Settings};
use tally_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based personal and business finance tracker",
    long_about = "TallyCLI records income and expenses for personal and business \
                  accounts, splits shared expenses with other users and tracks who \
                  has paid, and summarizes your money through dashboards, reports \
                  and spending insights."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<tally_cli::cli::ConfigCommands>,
    },

    /// User profile commands
    #[command(subcommand)]
    User(tally_cli::cli::UserCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(tally_cli::cli::TransactionCommands),

    /// Totals, recent activity and trends
    Dashboard {
        /// personal or business
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Shared-expense commands
    #[command(subcommand)]
    Split(tally_cli::cli::SplitCommands),

    /// Reports, period summaries and insights
    #[command(subcommand)]
    Report(tally_cli::cli::ReportCommands),

    /// Search your transactions
    Search(tally_cli::cli::SearchArgs),

    /// Receipt commands
    #[command(subcommand)]
    Receipt(tally_cli::cli::ReceiptCommands),

    /// Notification commands
    #[command(subcommand, alias = "notifications")]
    Notify(tally_cli::cli::NotifyCommands),

    /// Category budget commands
    #[command(subcommand)]
    Budget(tally_cli::cli::BudgetCommands),

    /// Subscription commands
    #[command(subcommand)]
    Subscription(tally_cli::cli::SubscriptionCommands),

    /// Export your data
    #[command(subcommand)]
    Export(tally_cli::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only this entity type (transaction, receipt, user, notification)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TallyPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing TallyCLI at: {}", paths.base_dir().display());
            tally_cli::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  tally user add you@example.com --name \"Your Name\"");
            println!("  tally txn add expense 12.50 -d \"Coffee\" --auto-categorize");
            println!("  tally dashboard");
        }
        Some(Commands::Config { command }) => {
            handle_config_command(&storage, &mut settings, command)?;
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &mut settings, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Dashboard { account }) => {
            handle_dashboard_command(&storage, &settings, account)?;
        }
        Some(Commands::Split(cmd)) => {
            handle_split_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Search(args)) => {
            handle_search_command(&storage, &settings, args)?;
        }
        Some(Commands::Receipt(cmd)) => {
            handle_receipt_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Notify(cmd)) => {
            handle_notify_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Subscription(cmd)) => {
            handle_subscription_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Audit { limit, entity }) => {
            handle_audit_command(&storage, limit, entity)?;
        }
        None => {
            println!("TallyCLI - personal and business finance tracker");
            println!();
            if !storage.is_initialized() {
                println!("No data directory yet. Run 'tally init' to create one.");
            }
            println!("Run 'tally --help' for usage information.");
        }
    }

    Ok(())
}
