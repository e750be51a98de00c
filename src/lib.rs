//! Proofkit core library.
//!
//! This crate exposes programmatic APIs for validating authored text with a
//! set of pluggable validators and fixing it with a chain of remediators.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `registry`: Validator and remediator catalogs keyed by name.
//! - `discovery`: Builtin and manifest-directory plugin sources.
//! - `validate`: Runs validators and aggregates their reports.
//! - `remediate`: Chains remediators over content.
//! - `validators` / `remediators`: Builtin plugin implementations.
//! - `models`: Issues, results, reports, plugin metadata and manifests.
//! - `output`: Human/JSON printers for check, fix and plugins.
//! - `text`: Word, sentence, syllable and markdown helpers.
//! - `guard`: Panic and time-budget containment for plugin calls.
//! - `logging`: `tracing` subscriber setup.
//!
//! ```
//! use proofkit::registry::Registry;
//! use proofkit::validate::{ValidationConfig, ValidationManager};
//! use std::sync::Arc;
//!
//! let manager = ValidationManager::new(Arc::new(Registry::builtin()), ValidationConfig::default());
//! let report = manager.validate("# Title\n\nShort text.\n", None, None);
//! assert!(report.score >= 0.0 && report.score <= 100.0);
//! ```
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod guard;
pub mod logging;
pub mod models;
pub mod output;
pub mod registry;
pub mod remediate;
pub mod remediators;
pub mod settings;
pub mod text;
pub mod validate;
pub mod validators;
