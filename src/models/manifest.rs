//! Plugin manifest schema: one TOML file declares one named plugin instance
//! backed by a builtin implementation.
//!
//! ```toml
//! kind = "validator"
//! name = "strict_readability"
//! version = "1.0.0"
//! implementation = "readability"
//! category = "readability"
//! tags = ["strict"]
//!
//! [config]
//! min_score = 50
//! ```

use super::plugin::{PluginKind, PluginMetadata};
use super::PluginConfig;
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
/// Top-level manifest.
pub struct PluginManifest {
    pub kind: PluginKind,
    pub name: String,
    pub version: String,
    /// Builtin implementation id this plugin instantiates.
    pub implementation: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Default configuration passed to the implementation's factory.
    #[serde(default)]
    pub config: PluginConfig,
}

impl PluginManifest {
    /// Metadata for the declared instance; unset fields inherit from the
    /// implementation's own metadata.
    pub fn metadata(&self, base: &PluginMetadata) -> PluginMetadata {
        PluginMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| base.description.clone()),
            author: self.author.clone().unwrap_or_else(|| base.author.clone()),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| base.category.clone()),
            tags: if self.tags.is_empty() {
                base.tags.clone()
            } else {
                self.tags.clone()
            },
        }
    }
}
