//! Error types. One enum per subsystem, `thiserror` only.
//!
//! Only registry misuse surfaces to callers as a hard error. Failures inside
//! a validator, remediator or plugin file are converted into data by the
//! managers and discovery.

use crate::models::plugin::PluginKind;
use std::path::PathBuf;
use std::time::Duration;

/// Registry misuse by the host application.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} '{name}' is already registered")]
    DuplicateName { kind: PluginKind, name: String },

    #[error("{kind} '{name}' is not registered")]
    NotFound { kind: PluginKind, name: String },
}

/// A single plugin that could not be loaded during discovery.
#[derive(Debug, thiserror::Error)]
pub enum PluginLoadError {
    #[error("failed to read plugin manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plugin manifest {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("plugin '{name}' refers to unknown {kind} implementation '{implementation}'")]
    UnknownImplementation {
        kind: PluginKind,
        name: String,
        implementation: String,
    },

    #[error("plugin '{name}' has invalid metadata: {reason}")]
    InvalidMetadata { name: String, reason: String },
}

/// Configuration file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path} is not valid TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config {path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failure reported by a grammar checking backend.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar backend '{backend}' is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("grammar backend '{backend}' failed: {reason}")]
    Failed { backend: String, reason: String },
}

/// A validator or remediator that did not complete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("panicked: {0}")]
    Panicked(String),

    #[error("exceeded time budget of {}ms", .0.as_millis())]
    TimedOut(Duration),
}
