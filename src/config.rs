//! Configuration discovery and effective settings resolution.
//!
//! Proofkit reads `proofkit.toml|yaml|yml` from the project root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `plugins`: none (no manifest discovery)
//! - `timeout_ms`: 5000 (`0` disables the budget)
//! - `parallel`: true
//! - `validation.default`: `readability`, `structure`, `grammar`
//!
//! Per-plugin sections: `[validators.<name>]` with `enabled` and a
//! `[validators.<name>.config]` table, `[remediators.<name>.config]`.
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::errors::ConfigError;
use crate::models::PluginConfig;
use crate::remediate::RemediationConfig;
use crate::validate::{ValidationConfig, DEFAULT_VALIDATORS};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILES: [&str; 3] = ["proofkit.toml", "proofkit.yaml", "proofkit.yml"];
const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Default, Deserialize, Clone)]
/// One `[validators.<name>]` or `[remediators.<name>]` section.
pub struct PluginSection {
    pub enabled: Option<bool>,
    #[serde(default)]
    pub config: PluginConfig,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[validation]` section.
pub struct ValidationSection {
    pub default: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `proofkit.toml|yaml`.
pub struct ProofkitConfig {
    pub output: Option<String>,
    pub plugins: Option<String>,
    pub timeout_ms: Option<u64>,
    pub parallel: Option<bool>,
    pub validation: Option<ValidationSection>,
    #[serde(default)]
    pub validators: HashMap<String, PluginSection>,
    #[serde(default)]
    pub remediators: HashMap<String, PluginSection>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    /// Manifest directory, absolute or relative to `repo_root`.
    pub plugins_dir: Option<PathBuf>,
    pub validation: ValidationConfig,
    pub remediation: RemediationConfig,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `proofkit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ProofkitConfig` from the first config file present under `root`.
pub fn load_config(root: &Path) -> Result<Option<ProofkitConfig>, ConfigError> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let cfg = if name.ends_with(".toml") {
            toml::from_str(&raw).map_err(|source| ConfigError::Toml { path, source })?
        } else {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml { path, source })?
        };
        return Ok(Some(cfg));
    }
    Ok(None)
}

fn section_configs(sections: &HashMap<String, PluginSection>) -> BTreeMap<String, PluginConfig> {
    sections
        .iter()
        .filter(|(_, s)| !s.config.is_empty())
        .map(|(name, s)| (name.clone(), s.config.clone()))
        .collect()
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_plugins: Option<&str>,
    cli_timeout_ms: Option<u64>,
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());

    let plugins_dir = cli_plugins
        .map(|s| s.to_string())
        .or(cfg.plugins.clone())
        .map(|p| repo_root.join(p));

    let timeout_ms = cli_timeout_ms.or(cfg.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS);
    let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

    let disabled: Vec<&String> = cfg
        .validators
        .iter()
        .filter(|(_, s)| s.enabled == Some(false))
        .map(|(name, _)| name)
        .collect();
    let default_validators = cfg
        .validation
        .as_ref()
        .and_then(|v| v.default.clone())
        .unwrap_or_else(|| DEFAULT_VALIDATORS.iter().map(|s| s.to_string()).collect())
        .into_iter()
        .filter(|name| !disabled.contains(&name))
        .collect();

    let validation = ValidationConfig {
        default_validators,
        timeout,
        parallel: cfg.parallel.unwrap_or(true),
        plugin_config: section_configs(&cfg.validators),
    };
    let remediation = RemediationConfig {
        timeout,
        plugin_config: section_configs(&cfg.remediators),
    };

    Ok(Effective {
        repo_root,
        output,
        plugins_dir,
        validation,
        remediation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("proofkit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
plugins = "plugins"
timeout_ms = 250
parallel = false

[validation]
default = ["readability", "inclusive_language"]

[validators.readability.config]
min_score = 50

[remediators.sentence_splitter.config]
max_words = 15
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None).unwrap();
        assert_eq!(eff.output, "json");
        assert_eq!(eff.plugins_dir, Some(root.join("plugins")));
        assert_eq!(eff.validation.timeout, Some(Duration::from_millis(250)));
        assert!(!eff.validation.parallel);
        assert_eq!(
            eff.validation.default_validators,
            vec!["readability", "inclusive_language"]
        );
        assert_eq!(eff.validation.plugin_config["readability"]["min_score"], 50);
        assert_eq!(eff.remediation.plugin_config["sentence_splitter"]["max_words"], 15);
        assert_eq!(eff.remediation.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("proofkit.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
validators:
  grammar:
    enabled: false
  structure:
    config:
      max_heading_depth: 2
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None).unwrap();
        assert_eq!(eff.output, "human");
        assert_eq!(eff.plugins_dir, None);
        assert_eq!(eff.validation.timeout, Some(Duration::from_millis(5000)));
        assert!(eff.validation.parallel);
        // Disabled validators drop out of the default set
        assert_eq!(eff.validation.default_validators, vec!["readability", "structure"]);
        assert_eq!(eff.validation.plugin_config["structure"]["max_heading_depth"], 2);
        assert!(!eff.validation.plugin_config.contains_key("grammar"));
    }

    #[test]
    fn test_cli_takes_precedence_and_zero_disables_timeout() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("proofkit.toml"), "output = \"json\"\ntimeout_ms = 100\n").unwrap();

        let eff = resolve_effective(root.to_str(), Some("human"), Some("/abs/plugins"), Some(0)).unwrap();
        assert_eq!(eff.output, "human");
        assert_eq!(eff.plugins_dir, Some(PathBuf::from("/abs/plugins")));
        assert_eq!(eff.validation.timeout, None);
    }

    #[test]
    fn test_root_is_found_from_a_subdirectory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("proofkit.yml"), "output: json\n").unwrap();
        let nested = root.join("docs").join("chapters");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
        let eff = resolve_effective(nested.to_str(), None, None, None).unwrap();
        assert_eq!(eff.output, "json");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("proofkit.toml"), "timeout_ms = \"soon\"\n").unwrap();
        let err = resolve_effective(root.to_str(), None, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
