//! Receipt repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TallyError;
use crate::models::{Receipt, ReceiptId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReceiptData {
    receipts: Vec<Receipt>,
}

pub struct ReceiptRepository {
    path: PathBuf,
    data: RwLock<HashMap<ReceiptId, Receipt>>,
}

impl ReceiptRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: ReceiptData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(write_lock_error)?;

        data.clear();
        for receipt in file_data.receipts {
            data.insert(receipt.id, receipt);
        }

        debug!(count = data.len(), "loaded receipts");
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let receipts = self.get_all()?;
        write_json_atomic(&self.path, &ReceiptData { receipts })
    }

    pub fn get(&self, id: ReceiptId) -> Result<Option<Receipt>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a receipt by full id or short form ("rcp-1a2b3c4d")
    pub fn find(&self, identifier: &str) -> Result<Option<Receipt>, TallyError> {
        if let Ok(id) = identifier.parse::<ReceiptId>() {
            return self.get(id);
        }
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data
            .values()
            .find(|r| r.id.matches_short(identifier))
            .cloned())
    }

    /// All receipts, most recently uploaded first
    pub fn get_all(&self) -> Result<Vec<Receipt>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let mut receipts: Vec<_> = data.values().cloned().collect();
        receipts.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(receipts)
    }

    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Receipt>, TallyError> {
        let mut receipts = self.get_all()?;
        receipts.retain(|r| r.user_id == user_id);
        Ok(receipts)
    }

    pub fn upsert(&self, receipt: Receipt) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        data.insert(receipt.id, receipt);
        Ok(())
    }

    pub fn delete(&self, id: ReceiptId) -> Result<Option<Receipt>, TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        Ok(data.remove(&id))
    }
}
