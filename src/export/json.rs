//! JSON Export functionality
//!
//! Exports everything stored for one user to JSON with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TallyError, TallyResult};
use crate::models::{Notification, Receipt, Transaction, UserProfile};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything stored for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user: UserProfile,

    /// Transactions the user owns
    pub transactions: Vec<Transaction>,

    /// Shared expenses other users paid that list this user
    pub shared_with_me: Vec<Transaction>,

    pub receipts: Vec<Receipt>,

    pub notifications: Vec<Notification>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub receipt_count: usize,
    pub notification_count: usize,
    /// Date of the earliest owned transaction
    pub earliest_transaction: Option<String>,
    /// Date of the latest owned transaction
    pub latest_transaction: Option<String>,
}

impl UserExport {
    /// Collect the user's data from storage
    pub fn from_storage(storage: &Storage, user: &UserProfile) -> TallyResult<Self> {
        let transactions = storage.transactions.get_by_user(user.id)?;
        let mut shared_with_me = storage.transactions.get_shared()?;
        shared_with_me.retain(|t| {
            !t.is_payer(user.id) && t.participant_index(&user.email, user.id).is_some()
        });
        let receipts = storage.receipts.get_by_user(user.id)?;
        let notifications = storage.notifications.get_by_user(user.id)?;

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            receipt_count: receipts.len(),
            notification_count: notifications.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: user.clone(),
            transactions,
            shared_with_me,
            receipts,
            notifications,
            metadata,
        })
    }
}

/// Export the user's data to JSON
pub fn export_user_json<W: Write>(
    storage: &Storage,
    user: &UserProfile,
    writer: &mut W,
    pretty: bool,
) -> TallyResult<()> {
    let export = UserExport::from_storage(storage, user)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TallyError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Money, TransactionType};
    use crate::services::{CreateTransactionInput, TransactionService, UserService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_contains_only_users_data() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("ana@example.com", None).unwrap();
        let ben = users.register("ben@example.com", None).unwrap();
        let service = TransactionService::new(&storage);

        for (owner, day) in [(&ana, 1), (&ana, 9), (&ben, 4)] {
            service
                .create(
                    owner,
                    CreateTransactionInput {
                        transaction_type: TransactionType::Expense,
                        amount: Money::from_cents(1000),
                        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
                        shared_with: if owner.id == ben.id {
                            vec!["ana@example.com".into()]
                        } else {
                            Vec::new()
                        },
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let mut out = Vec::new();
        export_user_json(&storage, &ana, &mut out, true).unwrap();
        let export: UserExport = serde_json::from_slice(&out).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.user.email, "ana@example.com");
        assert_eq!(export.metadata.transaction_count, 2);
        assert_eq!(export.shared_with_me.len(), 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-06-01"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2025-06-09"));
    }
}
