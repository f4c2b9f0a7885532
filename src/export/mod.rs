//! Export module for TallyCLI
//!
//! Full data export for the active user:
//! - CSV: transactions in the report layout (spreadsheet-compatible)
//! - JSON: machine-readable export of all the user's records
//! - YAML: human-readable export of the same records

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_transactions_csv;
pub use json::{export_user_json, ExportMetadata, UserExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_user_yaml;
