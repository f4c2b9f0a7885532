//! Receipt display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Receipt;

use super::truncate;

#[derive(Tabled)]
struct ReceiptRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Transaction")]
    transaction: String,
}

impl From<&Receipt> for ReceiptRow {
    fn from(receipt: &Receipt) -> Self {
        let (merchant, total) = match &receipt.extracted {
            Some(data) => (truncate(&data.merchant, 20), data.total.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            id: receipt.id.to_string(),
            uploaded: receipt.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            file: truncate(&receipt.original_name, 24),
            status: receipt.status.to_string(),
            merchant,
            total,
            transaction: receipt
                .transaction_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn format_receipt_table(receipts: &[Receipt]) -> String {
    if receipts.is_empty() {
        return "No receipts found.\n".to_string();
    }
    let rows: Vec<ReceiptRow> = receipts.iter().map(ReceiptRow::from).collect();
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// Format a receipt with its extracted data
pub fn format_receipt_details(receipt: &Receipt) -> String {
    let mut output = String::new();
    output.push_str(&format!("Receipt:  {}\n", receipt.id));
    output.push_str(&format!("File:     {}\n", receipt.original_name));
    output.push_str(&format!("Stored:   {}\n", receipt.file_ref));
    output.push_str(&format!("Status:   {}\n", receipt.status));
    if let Some(txn) = receipt.transaction_id {
        output.push_str(&format!("Linked:   {}\n", txn));
    }

    let Some(data) = &receipt.extracted else {
        return output;
    };
    if receipt.is_placeholder {
        output.push_str("Note:     placeholder data, no text could be read\n");
    }
    output.push_str(&format!("Merchant: {}\n", data.merchant));
    output.push_str(&format!("Date:     {}\n", data.date));
    output.push_str(&format!("Total:    {}\n", data.total));
    if data.tax_amount.is_positive() {
        output.push_str(&format!("Tax:      {}\n", data.tax_amount));
    }
    if !data.items.is_empty() {
        output.push_str("Items:\n");
        for item in &data.items {
            output.push_str(&format!("  {:<30} {:>12}\n", truncate(&item.name, 30), item.price));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedReceipt, Money, ReceiptItem, UserId};
    use chrono::NaiveDate;

    #[test]
    fn test_unprocessed_receipt_row() {
        let receipt = Receipt::new(UserId::new(), "receipts/u/1_lunch.jpg", "lunch.jpg");
        let table = format_receipt_table(&[receipt]);
        assert!(table.contains("lunch.jpg"));
        assert!(table.contains("uploaded"));
    }

    #[test]
    fn test_details_list_items() {
        let mut receipt = Receipt::new(UserId::new(), "receipts/u/1_shop.jpg", "shop.jpg");
        receipt.record_extraction(
            ExtractedReceipt {
                merchant: "Corner Shop".into(),
                date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                total: Money::from_cents(2345),
                items: vec![ReceiptItem {
                    name: "Apples".into(),
                    price: Money::from_cents(345),
                }],
                tax_amount: Money::zero(),
            },
            false,
        );
        let details = format_receipt_details(&receipt);
        assert!(details.contains("Merchant: Corner Shop"));
        assert!(details.contains("Apples"));
        assert!(!details.contains("placeholder"));
        assert!(!details.contains("Tax:"));
    }
}
