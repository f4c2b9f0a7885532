//! Storage layer for TallyCLI
//!
//! A local document store: one JSON file per collection, written atomically,
//! plus a directory-backed object store for uploaded files. Every mutation
//! made through the services is also recorded in the audit log.

pub mod file_io;
pub mod init;
pub mod notifications;
pub mod objects;
pub mod receipts;
pub mod transactions;
pub mod users;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use notifications::NotificationRepository;
pub use objects::{ObjectFolder, ObjectStore};
pub use receipts::ReceiptRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TallyPaths;
use crate::error::TallyError;

pub(crate) fn read_lock_error<E: std::fmt::Display>(e: E) -> TallyError {
    TallyError::Storage(format!("Failed to acquire read lock: {}", e))
}

pub(crate) fn write_lock_error<E: std::fmt::Display>(e: E) -> TallyError {
    TallyError::Storage(format!("Failed to acquire write lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    audit: AuditLogger,
    pub transactions: TransactionRepository,
    pub receipts: ReceiptRepository,
    pub users: UserRepository,
    pub notifications: NotificationRepository,
    pub objects: ObjectStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            receipts: ReceiptRepository::new(paths.receipts_file()),
            users: UserRepository::new(paths.users_file()),
            notifications: NotificationRepository::new(paths.notifications_file()),
            objects: ObjectStore::new(paths.uploads_dir()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all collections from disk
    pub fn load_all(&mut self) -> Result<(), TallyError> {
        self.transactions.load()?;
        self.receipts.load()?;
        self.users.load()?;
        self.notifications.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    ///
    /// When no summary is given, one is computed from the JSON forms.
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), TallyError> {
        let mut entry =
            AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff_summary);
        if entry.diff_summary.is_none() {
            if let (Some(b), Some(a)) = (&entry.before, &entry.after) {
                entry.diff_summary = crate::audit::generate_diff(b, a);
            }
        }
        self.audit.log(&entry)
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("uploads").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_log_update_computes_diff() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage
            .log_update(
                EntityType::Transaction,
                "txn-12345678",
                None,
                &json!({"amount": 100}),
                &json!({"amount": 250}),
                None,
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("amount: 100 -> 250"));
    }
}
