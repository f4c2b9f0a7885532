//! CSV Export functionality
//!
//! Exports all of a user's transactions in the report CSV layout.

use std::io::Write;

use crate::error::TallyResult;
use crate::models::UserProfile;
use crate::reports::{FinancialReport, ReportFilter};
use crate::storage::Storage;

/// Export every transaction the user owns, newest first
///
/// Returns the number of rows written.
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    user: &UserProfile,
    date_format: &str,
    writer: W,
) -> TallyResult<usize> {
    let transactions = storage.transactions.get_by_user(user.id)?;
    let report = FinancialReport::generate_with_format(
        &transactions,
        ReportFilter::default(),
        user.name(),
        date_format,
    );
    report.export_csv(writer)?;
    Ok(report.transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Money, Transaction, TransactionType};
    use crate::services::UserService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_export_uses_date_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let user = UserService::new(&storage).register("ana@example.com", None).unwrap();

        let mut txn = Transaction::new(
            user.id,
            TransactionType::Income,
            Money::from_cents(123456),
            NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
        );
        txn.description = "Invoice, July".into();
        storage.transactions.upsert(txn).unwrap();

        let mut out = Vec::new();
        let rows = export_transactions_csv(&storage, &user, "%m/%d/%Y", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rows, 1);
        assert!(text.contains("\"07/04/2025\",\"Invoice, July\",\"Uncategorized\",\"Income\",\"1234.56\""));
    }
}
