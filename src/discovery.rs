//! Plugin sources for `Registry::discover`.
//!
//! - `BuiltinSource`: the compile-time list of builtin implementations.
//! - `ManifestSource`: every `*.toml` under a directory (recursive, sorted
//!   by path). Each manifest names a builtin `implementation` and may carry
//!   default `[config]` for it, so one implementation can back several
//!   differently tuned plugins.
//!
//! Loading is per plugin: a manifest that cannot be read, parsed or
//! resolved yields an error entry and the remaining manifests still load.

use crate::errors::PluginLoadError;
use crate::models::manifest::PluginManifest;
use crate::models::plugin::PluginKind;
use crate::registry::{Plugin, Registered};
use crate::remediators;
use crate::validators;
use glob::glob;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A source of plugins. Each entry either loaded or failed on its own.
pub trait PluginSource {
    fn name(&self) -> &str;
    fn load(&self) -> Vec<Result<Plugin, PluginLoadError>>;
}

/// Compile-time builtin validators and remediators.
pub struct BuiltinSource;

impl PluginSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    fn load(&self) -> Vec<Result<Plugin, PluginLoadError>> {
        let vals = validators::builtin()
            .into_iter()
            .map(|(meta, make)| Ok(Plugin::Validator(Registered::new(meta, make))));
        let rems = remediators::builtin()
            .into_iter()
            .map(|(meta, make)| Ok(Plugin::Remediator(Registered::new(meta, make))));
        vals.chain(rems).collect()
    }
}

/// Directory of TOML plugin manifests.
pub struct ManifestSource {
    root: PathBuf,
    label: String,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let label = root.to_string_lossy().to_string();
        Self { root, label }
    }

    /// Manifest paths under the root, sorted. A missing root yields none.
    fn manifest_paths(&self) -> Vec<PathBuf> {
        let pattern = self.root.join("**").join("*.toml");
        let mut paths: Vec<PathBuf> = match glob(&pattern.to_string_lossy()) {
            Ok(entries) => entries.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
            Err(_) => Vec::new(),
        };
        paths.sort();
        paths
    }

    fn load_one(&self, path: &Path, semver: &Regex) -> Result<Plugin, PluginLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| PluginLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: PluginManifest = toml::from_str(&raw).map_err(|source| PluginLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if manifest.name.trim().is_empty() {
            return Err(PluginLoadError::InvalidMetadata {
                name: manifest.name.clone(),
                reason: "name is empty".into(),
            });
        }
        if !semver.is_match(&manifest.version) {
            return Err(PluginLoadError::InvalidMetadata {
                name: manifest.name.clone(),
                reason: format!("version '{}' is not MAJOR.MINOR.PATCH", manifest.version),
            });
        }

        let origin = pathdiff::diff_paths(path, &self.root)
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .to_string();
        let unknown = || PluginLoadError::UnknownImplementation {
            kind: manifest.kind,
            name: manifest.name.clone(),
            implementation: manifest.implementation.clone(),
        };

        match manifest.kind {
            PluginKind::Validator => {
                let (base, make) = validators::builtin()
                    .into_iter()
                    .find(|(m, _)| m.name == manifest.implementation)
                    .ok_or_else(unknown)?;
                Ok(Plugin::Validator(
                    Registered::new(manifest.metadata(&base), make)
                        .with_defaults(manifest.config.clone())
                        .from_origin(origin),
                ))
            }
            PluginKind::Remediator => {
                let (base, make) = remediators::builtin()
                    .into_iter()
                    .find(|(m, _)| m.name == manifest.implementation)
                    .ok_or_else(unknown)?;
                Ok(Plugin::Remediator(
                    Registered::new(manifest.metadata(&base), make)
                        .with_defaults(manifest.config.clone())
                        .from_origin(origin),
                ))
            }
        }
    }
}

impl PluginSource for ManifestSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn load(&self) -> Vec<Result<Plugin, PluginLoadError>> {
        let semver = match Regex::new(r"^\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?$") {
            Ok(re) => re,
            Err(_) => return Vec::new(),
        };
        self.manifest_paths()
            .iter()
            .map(|p| self.load_one(p, &semver))
            .collect()
    }
}
