//! Audit log CLI command

use crate::audit::EntityType;
use crate::error::TallyResult;
use crate::storage::Storage;

use super::parse_optional_kind;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(
    storage: &Storage,
    limit: usize,
    entity: Option<String>,
) -> TallyResult<()> {
    let entity_type = parse_optional_kind::<EntityType>(entity.as_deref())?;
    let entries = storage.audit().read_recent(limit, entity_type)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
