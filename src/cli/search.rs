//! Search CLI command

use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_transaction_table;
use crate::error::TallyResult;
use crate::services::{SearchFilter, SearchService, UserService};
use crate::storage::Storage;

use super::{parse_amount, parse_optional_date, parse_optional_kind};

/// Search arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in descriptions, categories and notes
    pub term: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Smallest amount
    #[arg(long)]
    pub min: Option<String>,
    /// Largest amount
    #[arg(long)]
    pub max: Option<String>,
    /// personal or business
    #[arg(short, long)]
    pub account: Option<String>,
    /// Any of these categories (repeat or comma separate)
    #[arg(short, long, value_delimiter = ',')]
    pub category: Vec<String>,
    /// Only shared transactions
    #[arg(long, conflicts_with = "not_shared")]
    pub shared: bool,
    /// Only transactions that are not shared
    #[arg(long)]
    pub not_shared: bool,
    /// Show recent searches instead of searching
    #[arg(long, conflicts_with_all = ["term", "clear_recent"])]
    pub recent: bool,
    /// Forget recent searches
    #[arg(long, conflicts_with = "term")]
    pub clear_recent: bool,
}

/// Handle the search command
pub fn handle_search_command(
    storage: &Storage,
    settings: &Settings,
    args: SearchArgs,
) -> TallyResult<()> {
    let service = SearchService::new(storage).with_recent_limit(settings.recent_search_limit);
    let user = UserService::new(storage).current(settings)?;

    if args.recent {
        let recent = service.recent(user.id)?;
        if recent.is_empty() {
            println!("No recent searches.");
        }
        for term in recent {
            println!("  {}", term);
        }
        return Ok(());
    }
    if args.clear_recent {
        service.clear_recent(user.id)?;
        println!("Recent searches cleared.");
        return Ok(());
    }

    let filter = SearchFilter {
        term: args.term,
        start_date: parse_optional_date(args.from.as_deref())?,
        end_date: parse_optional_date(args.to.as_deref())?,
        min_amount: args.min.as_deref().map(parse_amount).transpose()?,
        max_amount: args.max.as_deref().map(parse_amount).transpose()?,
        account_type: parse_optional_kind(args.account.as_deref())?,
        categories: args.category,
        is_shared: match (args.shared, args.not_shared) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
    };

    let results = service.search(&user, &filter)?;
    print!("{}", format_transaction_table(&results, &settings.date_format));
    if !results.is_empty() {
        println!("{} match(es)", results.len());
    }
    Ok(())
}
