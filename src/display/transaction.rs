//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Receipt, Transaction};

use super::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, date_format: &str) -> Self {
        let sign = if txn.is_income() { "+" } else { "-" };
        let mut flags = Vec::new();
        if txn.is_shared {
            flags.push(format!("shared:{}", txn.payment_status));
        }
        if txn.has_receipt() {
            flags.push("receipt".to_string());
        }
        if txn.voice_note.is_some() {
            flags.push("voice".to_string());
        }

        Self {
            id: txn.id.to_string(),
            date: txn.date.format(date_format).to_string(),
            description: truncate(&txn.description, 30),
            category: truncate(txn.display_category(), 18),
            amount: format!("{}{}", sign, txn.amount),
            account: txn.account_type.to_string(),
            flags: flags.join(" "),
        }
    }
}

/// Format a list of transactions as a table
pub fn format_transaction_table(transactions: &[Transaction], date_format: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions
        .iter()
        .map(|t| TransactionRow::new(t, date_format));
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    payer_name: &str,
    receipt: Option<&Receipt>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.display_category()));
    output.push_str(&format!("Account:     {}\n", txn.account_type));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if !txn.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", txn.notes));
    }

    if txn.is_shared {
        output.push_str(&format!("Paid by:     {}\n", payer_name));
        output.push_str(&format!("Shared with: {}\n", txn.shared_with.join(", ")));
        output.push_str(&format!("Status:      {}\n", txn.payment_status));
        if let Some(paid_at) = txn.paid_at {
            output.push_str(&format!("Paid at:     {}\n", paid_at.format("%Y-%m-%d %H:%M")));
        }
        if let Some(reminded) = txn.last_reminder_sent {
            output.push_str(&format!("Reminded:    {}\n", reminded.format("%Y-%m-%d %H:%M")));
        }
    }

    match (txn.receipt_id, receipt) {
        (Some(_), Some(r)) => {
            output.push_str(&format!("Receipt:     {} ({})\n", r.id, r.original_name))
        }
        (Some(id), None) => output.push_str(&format!("Receipt:     {} (missing)\n", id)),
        _ => {}
    }
    if let Some(key) = &txn.voice_note {
        output.push_str(&format!("Voice note:  {}\n", key));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentStatus, TransactionType, UserId};
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        let mut txn = Transaction::new(
            UserId::new(),
            TransactionType::Expense,
            Money::from_cents(4250),
            NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(),
        );
        txn.description = "Team lunch".into();
        txn.category = "Dining".into();
        txn.is_shared = true;
        txn.shared_with = vec!["kai@example.com".into()];
        txn.payment_status = PaymentStatus::Pending;
        txn
    }

    #[test]
    fn test_table_contains_row_values() {
        let table = format_transaction_table(&[sample()], "%d/%m/%Y");
        assert!(table.contains("Team lunch"));
        assert!(table.contains("09/04/2025"));
        assert!(table.contains("-$42.50"));
        assert!(table.contains("shared:pending"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_transaction_table(&[], "%Y-%m-%d"), "No transactions found.\n");
    }

    #[test]
    fn test_details_show_sharing() {
        let details = format_transaction_details(&sample(), "Ana", None);
        assert!(details.contains("Paid by:     Ana"));
        assert!(details.contains("Shared with: kai@example.com"));
        assert!(details.contains("Status:      pending"));
    }
}
