//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TallyError;
use crate::models::{Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with an owner index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: owner -> transaction ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the owner index
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_user = self.by_user.write().map_err(write_lock_error)?;

        data.clear();
        by_user.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        debug!(count = data.len(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a transaction by full id or short form ("txn-1a2b3c4d")
    pub fn find(&self, identifier: &str) -> Result<Option<Transaction>, TallyError> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id);
        }
        let data = self.data.read().map_err(read_lock_error)?;
        let mut matches = data.values().filter(|t| t.id.matches_short(identifier));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(Some(txn.clone())),
            (Some(_), Some(_)) => Err(TallyError::Validation(format!(
                "'{}' matches more than one transaction; use more characters",
                identifier
            ))),
            _ => Ok(None),
        }
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions owned by a user, newest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let by_user = self.by_user.read().map_err(read_lock_error)?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Shared transactions, newest first
    pub fn get_shared(&self) -> Result<Vec<Transaction>, TallyError> {
        let mut shared = self.get_all()?;
        shared.retain(|t| t.is_shared);
        Ok(shared)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_user = self.by_user.write().map_err(write_lock_error)?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_user.get_mut(&old.user_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_user.entry(txn.user_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_user = self.by_user.write().map_err(write_lock_error)?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_user.get_mut(&txn.user_id) {
                ids.retain(|&tid| tid != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}
