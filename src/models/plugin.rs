//! Plugin identity records used by the registry and discovery.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The two plugin namespaces. Names only need to be unique within a kind.
pub enum PluginKind {
    Validator,
    Remediator,
}

impl PluginKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PluginKind::Validator => "validator",
            PluginKind::Remediator => "remediator",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Identity and discovery record attached to every validator and remediator.
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl PluginMetadata {
    pub fn new(name: &str, version: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            author: String::new(),
            category: category.to_string(),
            tags: BTreeSet::new(),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn by(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn tagged(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }
}

#[derive(Debug, Clone, Default)]
/// Optional filters for `Registry::list`. Both must match when set.
pub struct PluginFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl PluginFilter {
    pub fn matches(&self, meta: &PluginMetadata) -> bool {
        let cat_ok = self
            .category
            .as_ref()
            .map(|c| meta.category.eq_ignore_ascii_case(c))
            .unwrap_or(true);
        let tag_ok = self
            .tag
            .as_ref()
            .map(|t| meta.tags.contains(t))
            .unwrap_or(true);
        cat_ok && tag_ok
    }
}
