//! Audit logging system for TallyCLI
//!
//! Records every create, update and delete of transactions, receipts, user
//! profiles and notifications with before/after snapshots in an append-only
//! JSONL file.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends and reads entries
//! - `generate_diff`: one-line summary of changes between two snapshots

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
