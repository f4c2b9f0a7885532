//! Display formatting for terminal output
//!
//! Tables and detail views for the CLI. List views are rendered with
//! `tabled`; detail views are aligned label/value lines.

pub mod notification;
pub mod receipt;
pub mod split;
pub mod transaction;
pub mod user;

pub use notification::format_notification_list;
pub use receipt::{format_receipt_details, format_receipt_table};
pub use split::{format_share_breakdown, format_split_summary, format_split_table, SplitRow};
pub use transaction::{format_transaction_details, format_transaction_table};
pub use user::{format_budget_status, format_subscription, format_user_list};

/// Shorten text to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 10), "a long ...");
        // Multi-byte characters are counted, not bytes
        assert_eq!(truncate("café crème brûlée", 8), "café ...");
    }
}
