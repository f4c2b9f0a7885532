//! Financial Report
//!
//! Filters a user's transactions and summarizes them for preview, CSV
//! export, JSON export and a paginated PDF document.

use std::collections::HashMap;
use std::io::{BufWriter, Write};

use chrono::{NaiveDate, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;

use crate::display::truncate;
use crate::error::{TallyError, TallyResult};
use crate::models::{AccountType, Money, Transaction, TransactionType};

/// Label used for an open end of the date range
pub const ALL_TIME: &str = "All time";

/// Body lines per page of the printable document
const PAGE_LINES: usize = 56;

// A4 portrait, monospaced body
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 4.5;
const FONT_SIZE: f32 = 9.0;

/// Report criteria; every field is optional
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportFilter {
    /// Inclusive start date
    pub start: Option<NaiveDate>,
    /// Inclusive end date
    pub end: Option<NaiveDate>,
    pub account_type: Option<AccountType>,
    /// Any of these categories; empty means all
    pub categories: Vec<String>,
    pub transaction_type: Option<TransactionType>,
}

impl ReportFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.start.map_or(true, |d| txn.date >= d)
            && self.end.map_or(true, |d| txn.date <= d)
            && self.account_type.map_or(true, |a| txn.account_type == a)
            && (self.categories.is_empty()
                || self
                    .categories
                    .iter()
                    .any(|c| txn.display_category().eq_ignore_ascii_case(c.trim())))
            && self
                .transaction_type
                .map_or(true, |t| txn.transaction_type == t)
    }

    /// Human-readable account scope ("All Accounts", "Personal", "Business")
    pub fn account_label(&self) -> &'static str {
        match self.account_type {
            None => "All Accounts",
            Some(AccountType::Personal) => "Personal",
            Some(AccountType::Business) => "Business",
        }
    }
}

/// Count and total of one category across all transaction types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub total: Money,
}

/// Headline numbers of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub transaction_count: usize,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net: Money,
    pub categories: Vec<CategorySummary>,
    pub start_label: String,
    pub end_label: String,
}

/// Financial Report
#[derive(Debug, Clone, Serialize)]
pub struct FinancialReport {
    pub filter: ReportFilter,
    pub summary: ReportSummary,
    /// Matching transactions, newest first
    pub transactions: Vec<Transaction>,
    pub generated_on: NaiveDate,
    pub generated_by: String,
    #[serde(skip)]
    date_format: String,
}

impl FinancialReport {
    /// Build a report from the transactions in scope
    pub fn generate(
        transactions: &[Transaction],
        filter: ReportFilter,
        generated_by: impl Into<String>,
    ) -> Self {
        Self::generate_with_format(transactions, filter, generated_by, "%Y-%m-%d")
    }

    /// Build a report, rendering dates with a chrono format string
    pub fn generate_with_format(
        transactions: &[Transaction],
        filter: ReportFilter,
        generated_by: impl Into<String>,
        date_format: &str,
    ) -> Self {
        let mut matching: Vec<Transaction> = transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        let mut by_category: HashMap<&str, (usize, Money)> = HashMap::new();
        for txn in &matching {
            if txn.is_income() {
                total_income += txn.amount;
            } else {
                total_expenses += txn.amount;
            }
            let entry = by_category
                .entry(txn.display_category())
                .or_insert((0, Money::zero()));
            entry.0 += 1;
            entry.1 += txn.amount;
        }

        let mut categories: Vec<CategorySummary> = by_category
            .into_iter()
            .map(|(category, (count, total))| CategorySummary {
                category: category.to_string(),
                count,
                total,
            })
            .collect();
        categories.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));

        let label = |date: Option<NaiveDate>| {
            date.map(|d| d.format(date_format).to_string())
                .unwrap_or_else(|| ALL_TIME.to_string())
        };

        let summary = ReportSummary {
            transaction_count: matching.len(),
            total_income,
            total_expenses,
            net: total_income - total_expenses,
            categories,
            start_label: label(filter.start),
            end_label: label(filter.end),
        };

        Self {
            filter,
            summary,
            transactions: matching,
            generated_on: Utc::now().date_naive(),
            generated_by: generated_by.into(),
            date_format: date_format.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// File name for a saved report ("financial-report-2025-03-01.csv")
    pub fn file_name(&self, extension: &str) -> String {
        format!("financial-report-{}.{}", self.generated_on, extension)
    }

    fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Format the report preview for terminal display
    pub fn format_terminal(&self) -> String {
        if self.is_empty() {
            return "No data for the selected filters.\n".to_string();
        }

        let s = &self.summary;
        let mut output = String::new();
        output.push_str(&format!(
            "Financial Report: {} to {}\n",
            s.start_label, s.end_label
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Account Type:       {}\n", self.filter.account_label()));
        output.push_str(&format!("Total Transactions: {}\n", s.transaction_count));
        output.push_str(&format!("Total Income:       {}\n", s.total_income));
        output.push_str(&format!("Total Expenses:     {}\n", s.total_expenses));
        output.push_str(&format!("Net:                {}\n\n", s.net));

        output.push_str(&format!("{:<28} {:>8} {:>14}\n", "Category", "Count", "Total"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for category in &s.categories {
            output.push_str(&format!(
                "{:<28} {:>8} {:>14}\n",
                truncate(&category.category, 28),
                category.count,
                category.total
            ));
        }
        output
    }

    /// Export matching transactions as CSV, every field quoted
    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);

        csv.write_record([
            "Date",
            "Description",
            "Category",
            "Type",
            "Amount",
            "Account",
            "Shared",
            "PaymentStatus",
        ])?;

        for txn in &self.transactions {
            csv.write_record([
                self.date(txn.date),
                txn.description.clone(),
                txn.display_category().to_string(),
                type_label(txn.transaction_type).to_string(),
                txn.amount.to_decimal_string(),
                account_label(txn.account_type).to_string(),
                if txn.is_shared { "Yes" } else { "No" }.to_string(),
                if txn.is_shared {
                    txn.payment_status.to_string()
                } else {
                    "N/A".to_string()
                },
            ])?;
        }

        csv.flush()
            .map_err(|e| TallyError::Export(e.to_string()))
    }

    /// Export the summary and transactions as pretty JSON
    pub fn export_json<W: Write>(&self, writer: W) -> TallyResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| TallyError::Export(e.to_string()))
    }

    /// Lay the printable report out as pages of text lines
    ///
    /// Every page ends with the "Generated on" footer and a page number.
    pub fn document_pages(&self) -> Vec<Vec<String>> {
        let s = &self.summary;
        let mut body: Vec<String> = vec![
            "FINANCIAL REPORT".to_string(),
            String::new(),
            format!("Date Range: {} to {}", s.start_label, s.end_label),
            format!("Account Type: {}", self.filter.account_label()),
            String::new(),
            "Summary".to_string(),
            "-------".to_string(),
            format!("Total Transactions: {}", s.transaction_count),
            format!("Total Income: {}", s.total_income),
            format!("Total Expenses: {}", s.total_expenses),
            format!("Net: {}", s.net),
            String::new(),
            "Transactions".to_string(),
            "------------".to_string(),
            format!(
                "{:<12} {:<26} {:<16} {:<8} {:>12} {:<9}",
                "Date", "Description", "Category", "Type", "Amount", "Account"
            ),
        ];

        for txn in &self.transactions {
            body.push(format!(
                "{:<12} {:<26} {:<16} {:<8} {:>12} {:<9}",
                self.date(txn.date),
                truncate(&txn.description, 26),
                truncate(txn.display_category(), 16),
                type_label(txn.transaction_type),
                txn.amount,
                account_label(txn.account_type)
            ));
        }

        body.push(String::new());
        body.push("Category Breakdown".to_string());
        body.push("------------------".to_string());
        body.push(format!("{:<28} {:>8} {:>14}", "Category", "Count", "Total Amount"));
        for category in &s.categories {
            body.push(format!(
                "{:<28} {:>8} {:>14}",
                truncate(&category.category, 28),
                category.count,
                category.total
            ));
        }

        let page_count = body.chunks(PAGE_LINES).len();
        let footer = format!(
            "Generated on {} by {}",
            self.date(self.generated_on),
            self.generated_by
        );

        body.chunks(PAGE_LINES)
            .enumerate()
            .map(|(i, lines)| {
                let mut page = lines.to_vec();
                page.push(String::new());
                page.push(format!("{}    Page {} of {}", footer, i + 1, page_count));
                page
            })
            .collect()
    }

    /// Render the report as a PDF document
    pub fn export_pdf<W: Write>(&self, writer: W) -> TallyResult<()> {
        let pdf_error = |e: printpdf::Error| TallyError::Export(format!("PDF rendering failed: {}", e));

        let (doc, first_page, first_layer) = PdfDocument::new(
            "Financial Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Report",
        );
        let font = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;

        for (i, lines) in self.document_pages().iter().enumerate() {
            let (page, layer) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Report")
            };
            let layer = doc.get_page(page).get_layer(layer);
            for (row, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let y = PAGE_HEIGHT_MM - MARGIN_MM - row as f32 * LINE_HEIGHT_MM;
                layer.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(writer)).map_err(pdf_error)
    }
}

fn type_label(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
    }
}

fn account_label(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Personal => "Personal",
        AccountType::Business => "Business",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, UserId};

    fn txn(kind: TransactionType, cents: i64, category: &str, day: u32) -> Transaction {
        let mut t = Transaction::new(
            UserId::new(),
            kind,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        );
        t.category = category.into();
        t.description = format!("{} {}", category, day);
        t
    }

    fn sample() -> Vec<Transaction> {
        let mut business = txn(TransactionType::Expense, 2000, "Office", 10);
        business.account_type = AccountType::Business;
        let mut shared = txn(TransactionType::Expense, 3000, "Dining", 12);
        shared.is_shared = true;
        shared.shared_with = vec!["x@example.com".into()];
        shared.payment_status = PaymentStatus::Pending;
        vec![
            txn(TransactionType::Income, 100000, "Salary", 1),
            txn(TransactionType::Expense, 4550, "Groceries", 5),
            business,
            shared,
        ]
    }

    #[test]
    fn test_summary_totals() {
        let report = FinancialReport::generate(&sample(), ReportFilter::default(), "Ana");
        let s = &report.summary;
        assert_eq!(s.transaction_count, 4);
        assert_eq!(s.total_income.cents(), 100000);
        assert_eq!(s.total_expenses.cents(), 9550);
        assert_eq!(s.net.cents(), 90450);
        assert_eq!(s.start_label, ALL_TIME);
        assert_eq!(s.categories[0].category, "Salary");
        assert_eq!(s.categories.len(), 4);
        // Newest first
        assert_eq!(report.transactions[0].date.to_string(), "2025-03-12");
    }

    #[test]
    fn test_filter_is_inclusive_and_combined() {
        let filter = ReportFilter {
            start: NaiveDate::from_ymd_opt(2025, 3, 5),
            end: NaiveDate::from_ymd_opt(2025, 3, 10),
            transaction_type: Some(TransactionType::Expense),
            ..Default::default()
        };
        let report = FinancialReport::generate(&sample(), filter, "Ana");
        assert_eq!(report.summary.transaction_count, 2);
        assert_eq!(report.summary.start_label, "2025-03-05");

        let filter = ReportFilter {
            account_type: Some(AccountType::Business),
            ..Default::default()
        };
        let report = FinancialReport::generate(&sample(), filter, "Ana");
        assert_eq!(report.summary.transaction_count, 1);
        assert_eq!(report.filter.account_label(), "Business");

        let filter = ReportFilter {
            categories: vec!["groceries".into(), "dining".into()],
            ..Default::default()
        };
        let report = FinancialReport::generate(&sample(), filter, "Ana");
        assert_eq!(report.summary.transaction_count, 2);
    }

    #[test]
    fn test_csv_export_quotes_every_field() {
        let report = FinancialReport::generate(&sample(), ReportFilter::default(), "Ana");
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "\"Date\",\"Description\",\"Category\",\"Type\",\"Amount\",\"Account\",\"Shared\",\"PaymentStatus\""
        );
        assert_eq!(
            lines[1],
            "\"2025-03-12\",\"Dining 12\",\"Dining\",\"Expense\",\"30.00\",\"Personal\",\"Yes\",\"pending\""
        );
        assert!(lines[2].ends_with("\"20.00\",\"Business\",\"No\",\"N/A\""));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_document_pages_carry_footer() {
        let many: Vec<Transaction> = (0..120)
            .map(|i| txn(TransactionType::Expense, 100 + i, "Misc", 1 + (i as u32 % 28)))
            .collect();
        let report = FinancialReport::generate(&many, ReportFilter::default(), "Ana");
        let pages = report.document_pages();

        assert!(pages.len() > 1);
        assert_eq!(pages[0][0], "FINANCIAL REPORT");
        for (i, page) in pages.iter().enumerate() {
            assert!(page.len() <= PAGE_LINES + 2);
            let footer = page.last().unwrap();
            assert!(footer.starts_with("Generated on"));
            assert!(footer.contains(" by Ana"));
            assert!(footer.ends_with(&format!("Page {} of {}", i + 1, pages.len())));
        }
    }

    #[test]
    fn test_pdf_export_writes_pdf() {
        let report = FinancialReport::generate(&sample(), ReportFilter::default(), "Ana");
        let mut out = Vec::new();
        report.export_pdf(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_report() {
        let report = FinancialReport::generate(&[], ReportFilter::default(), "Ana");
        assert!(report.is_empty());
        assert!(report.format_terminal().starts_with("No data"));
    }
}
