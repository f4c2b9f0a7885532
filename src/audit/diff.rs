//! Diff generation for audit logging
//!
//! Produces a one-line summary of what changed between two JSON snapshots of
//! an entity. Nested objects (such as a profile's budgets) are reported with
//! dotted paths; bookkeeping timestamps are skipped.

use serde_json::Value;

/// Fields that change on every write and carry no information for the reader
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// Generate a human-readable diff between two JSON values
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(before: &Value, after: &Value, prefix: &str, changes: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            for (key, before_val) in before_obj {
                if prefix.is_empty() && IGNORED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                let path = join_path(prefix, key);
                match after_obj.get(key) {
                    Some(after_val) => collect_changes(before_val, after_val, &path, changes),
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        path,
                        format_value(before_val)
                    )),
                }
            }
            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!(
                        "{}: (added) -> {}",
                        join_path(prefix, key),
                        format_value(after_val)
                    ));
                }
            }
        }
        _ if before != after => {
            let label = if prefix.is_empty() { "value" } else { prefix };
            changes.push(format!(
                "{}: {} -> {}",
                label,
                format_value(before),
                format_value(after)
            ));
        }
        _ => {}
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
