//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod budget;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod notify;
pub mod receipt;
pub mod report;
pub mod search;
pub mod split;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use dashboard::handle_dashboard_command;
pub use export::{handle_export_command, ExportCommands};
pub use notify::{handle_notify_command, NotifyCommands};
pub use receipt::{handle_receipt_command, ReceiptCommands};
pub use report::{handle_report_command, ReportCommands, ReportFormat};
pub use search::{handle_search_command, SearchArgs};
pub use split::{handle_split_command, SplitCommands};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{TallyError, TallyResult};
use crate::models::Money;

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(value: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        TallyError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", value))
    })
}

pub(crate) fn parse_optional_date(value: Option<&str>) -> TallyResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

/// Parse an amount argument such as "42.50"
pub(crate) fn parse_amount(value: &str) -> TallyResult<Money> {
    Money::parse(value).map_err(|e| {
        TallyError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '42.50' or '100'. Error: {}",
            value, e
        ))
    })
}

/// Parse one of the model enums, reporting the accepted values on failure
pub(crate) fn parse_kind<T>(value: &str) -> TallyResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map_err(|e| TallyError::Validation(e.to_string()))
}

pub(crate) fn parse_optional_kind<T>(value: Option<&str>) -> TallyResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    value.map(parse_kind).transpose()
}

/// Today's date in local time
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
