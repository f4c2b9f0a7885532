//! Shared-expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Transaction, UserProfile};
use crate::services::{PartyShare, SplitSummary};

use super::truncate;

/// One shared expense as seen by a given user
#[derive(Debug, Clone, Tabled)]
pub struct SplitRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "Paid by")]
    pub payer: String,
    #[tabled(rename = "Your side")]
    pub your_side: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl SplitRow {
    pub fn new(txn: &Transaction, viewer: &UserProfile, payer_name: &str) -> Self {
        let your_side = if txn.is_payer(viewer.id) {
            format!("owed {}", txn.owed_to_payer())
        } else {
            match txn.share_for(&viewer.email, viewer.id) {
                Some(share) => format!("owe {}", share),
                None => "-".to_string(),
            }
        };
        let description = if txn.description.is_empty() {
            txn.display_category()
        } else {
            &txn.description
        };

        Self {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            description: truncate(description, 28),
            total: txn.amount.to_string(),
            payer: if txn.is_payer(viewer.id) {
                "you".to_string()
            } else {
                truncate(payer_name, 20)
            },
            your_side,
            status: txn.payment_status.to_string(),
        }
    }
}

pub fn format_split_table(rows: &[SplitRow]) -> String {
    if rows.is_empty() {
        return "No shared expenses found.\n".to_string();
    }
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

pub fn format_split_summary(summary: &SplitSummary) -> String {
    let mut output = String::new();
    output.push_str("Shared Expenses\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Total shared:  {:>14}\n", summary.total_shared));
    output.push_str(&format!("You owe:       {:>14}\n", summary.you_owe));
    output.push_str(&format!("Owed to you:   {:>14}\n", summary.owed_to_you));
    output.push_str(&format!(
        "Pending: {}   Settled: {}\n",
        summary.pending_count, summary.paid_count
    ));
    output
}

pub fn format_share_breakdown(txn: &Transaction, shares: &[PartyShare]) -> String {
    let mut output = format!("Split of {} ({} parties)\n", txn.amount, shares.len());
    for share in shares {
        let role = if share.is_payer { " (paid)" } else { "" };
        output.push_str(&format!(
            "  {:<32} {:>12}{}\n",
            truncate(&share.party, 32),
            share.amount,
            role
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentStatus, TransactionType};
    use crate::services::share_breakdown;
    use chrono::NaiveDate;

    fn shared_dinner(payer: &UserProfile) -> Transaction {
        let mut txn = Transaction::new(
            payer.id,
            TransactionType::Expense,
            Money::from_cents(9000),
            NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
        );
        txn.description = "Dinner".into();
        txn.is_shared = true;
        txn.shared_with = vec!["kai@example.com".into(), "lee@example.com".into()];
        txn.payment_status = PaymentStatus::Pending;
        txn
    }

    #[test]
    fn test_row_from_both_sides() {
        let ana = UserProfile::new("ana@example.com", "Ana");
        let kai = UserProfile::new("kai@example.com", "Kai");
        let txn = shared_dinner(&ana);

        let payer_row = SplitRow::new(&txn, &ana, "Ana");
        assert_eq!(payer_row.payer, "you");
        assert_eq!(payer_row.your_side, "owed $60.00");

        let participant_row = SplitRow::new(&txn, &kai, "Ana");
        assert_eq!(participant_row.payer, "Ana");
        assert_eq!(participant_row.your_side, "owe $30.00");

        let table = format_split_table(&[payer_row, participant_row]);
        assert!(table.contains("Paid by"));
        assert!(table.contains("pending"));
    }

    #[test]
    fn test_breakdown_marks_payer() {
        let ana = UserProfile::new("ana@example.com", "Ana");
        let txn = shared_dinner(&ana);
        let text = format_share_breakdown(&txn, &share_breakdown(&txn, "Ana"));
        assert!(text.contains("3 parties"));
        assert!(text.contains("(paid)"));
        assert!(text.contains("lee@example.com"));
    }
}
