//! Storage initialization
//!
//! Handles first-run setup: directories plus empty collection files.

use tracing::info;

use crate::config::paths::TallyPaths;
use crate::error::TallyError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing collections are left untouched, so running this twice is safe.
pub fn initialize_storage(paths: &TallyPaths) -> Result<(), TallyError> {
    paths.ensure_directories()?;

    let collections = [
        (paths.transactions_file(), "transactions"),
        (paths.receipts_file(), "receipts"),
        (paths.users_file(), "users"),
        (paths.notifications_file(), "notifications"),
    ];

    for (path, key) in collections {
        if !path.exists() {
            let mut empty = serde_json::Map::new();
            empty.insert(key.to_string(), serde_json::Value::Array(Vec::new()));
            write_json_atomic(&path, &empty)?;
            info!(collection = key, "created empty collection");
        }
    }

    Ok(())
}
