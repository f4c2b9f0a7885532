//! Dashboard CLI command

use crate::config::settings::Settings;
use crate::error::TallyResult;
use crate::models::AccountType;
use crate::reports::Dashboard;
use crate::services::{NotificationService, TransactionFilter, TransactionService, UserService};
use crate::storage::Storage;

use super::parse_optional_kind;

/// Print the dashboard for the active user
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    account: Option<String>,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let account_type = parse_optional_kind::<AccountType>(account.as_deref())?;

    let transactions = TransactionService::new(storage).list(&user, &TransactionFilter::new())?;
    let dashboard = Dashboard::generate(&transactions, account_type);
    print!("{}", dashboard.format_terminal());

    let unread = NotificationService::new(storage).unread_count(user.id)?;
    if unread > 0 {
        println!();
        println!("You have {} unread notification(s). Run 'tally notify list'.", unread);
    }
    Ok(())
}
