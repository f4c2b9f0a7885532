//! YAML Export functionality
//!
//! Exports a user's data to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::export::json::UserExport;
use crate::models::UserProfile;
use crate::storage::Storage;

/// Export the user's data to YAML format
pub fn export_user_yaml<W: Write>(
    storage: &Storage,
    user: &UserProfile,
    writer: &mut W,
) -> TallyResult<()> {
    let export = UserExport::from_storage(storage, user)?;

    let header = format!(
        "# TallyCLI Export\n# Generated: {}\n# App Version: {}\n# User: {}\n\n",
        export.exported_at, export.app_version, export.user.email
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TallyError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TallyError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::services::UserService;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export_has_header_and_user() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage =
            Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        let user = UserService::new(&storage)
            .register("ana@example.com", Some("Ana"))
            .unwrap();

        let mut out = Vec::new();
        export_user_yaml(&storage, &user, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# TallyCLI Export"));
        assert!(text.contains("email: ana@example.com"));
        assert!(text.contains("schema_version:"));
    }
}
