//! Append-only audit log
//!
//! Each entry is written as a single JSON line (JSONL) and flushed
//! immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{TallyError, TallyResult};

use super::entry::{AuditEntry, EntityType};

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry to the log
    pub fn log(&self, entry: &AuditEntry) -> TallyResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| TallyError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| TallyError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| TallyError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| TallyError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> TallyResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TallyError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                TallyError::Io(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                TallyError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, optionally restricted to one entity type
    pub fn read_recent(
        &self,
        count: usize,
        entity_type: Option<EntityType>,
    ) -> TallyResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        if let Some(kind) = entity_type {
            entries.retain(|e| e.entity_type == kind);
        }
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_recent_filters_by_type() {
        let (logger, _temp) = create_test_logger();

        for i in 0..6 {
            let kind = if i % 2 == 0 {
                EntityType::Transaction
            } else {
                EntityType::Notification
            };
            let entry = AuditEntry::create(kind, format!("id-{}", i), None, &json!({"i": i}));
            logger.log(&entry).unwrap();
        }

        let recent = logger.read_recent(2, Some(EntityType::Transaction)).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "id-2");
        assert_eq!(recent[1].entity_id, "id-4");

        assert_eq!(logger.read_recent(100, None).unwrap().len(), 6);
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(
                EntityType::User,
                "usr-12345678",
                None,
                &json!({"email": "a@example.com"}),
            ))
            .unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
