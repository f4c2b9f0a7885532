//! Local object store for uploaded files
//!
//! Keys look like `receipts/<user-uuid>/<millis>-<nonce>_<file name>` and map to
//! files under the uploads directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::TallyError;
use crate::models::UserId;

/// Top-level folders of the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFolder {
    Receipts,
    VoiceNotes,
}

impl ObjectFolder {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Receipts => "receipts",
            Self::VoiceNotes => "voice-notes",
        }
    }
}

pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Copy a local file into the store, returning its key
    pub fn put(
        &self,
        folder: ObjectFolder,
        user_id: UserId,
        source: &Path,
    ) -> Result<String, TallyError> {
        if !source.is_file() {
            return Err(TallyError::Io(format!(
                "File not found: {}",
                source.display()
            )));
        }

        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(sanitize_name)
            .unwrap_or_else(|| "upload".to_string());

        let key = format!(
            "{}/{}/{}-{}_{}",
            folder.as_str(),
            user_id.as_uuid(),
            Utc::now().timestamp_millis(),
            &Uuid::new_v4().simple().to_string()[..8],
            name
        );
        let target = self.path_for(&key)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TallyError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::copy(source, &target).map_err(|e| {
            TallyError::Storage(format!("Failed to store {}: {}", source.display(), e))
        })?;

        debug!(%key, "stored object");
        Ok(key)
    }

    /// Absolute path of a stored object
    pub fn path_for(&self, key: &str) -> Result<PathBuf, TallyError> {
        if key.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(TallyError::Storage(format!("Invalid object key: {}", key)));
        }
        Ok(self.root.join(key))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Remove an object; missing objects are not an error
    pub fn delete(&self, key: &str) -> Result<(), TallyError> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                TallyError::Storage(format!("Failed to delete {}: {}", path.display(), e))
            })?;
            debug!(%key, "deleted object");
        }
        Ok(())
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
