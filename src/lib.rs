//! TallyCLI - Terminal-based personal and business finance tracker
//!
//! This library provides the core functionality for the `tally` command:
//! recording income and expenses, splitting expenses with other users and
//! settling them, and summarizing spending through dashboards, reports and
//! insights.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, receipts, users, etc.)
//! - `storage`: JSON document store and uploaded-file object store
//! - `services`: Business logic layer
//! - `reports`: Aggregations, dashboard, reports, summaries and insights
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_cli::config::{paths::TallyPaths, settings::Settings};
//! use tally_cli::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
