//! Plugin registry: two independent catalogs (validators, remediators)
//! keyed by name, in registration order.
//!
//! The registry is filled with `&mut` access (explicit registration or
//! discovery) and then shared read-only, typically as `Arc<Registry>`.

use crate::discovery::PluginSource;
use crate::errors::RegistryError;
use crate::models::plugin::{PluginFilter, PluginKind, PluginMetadata};
use crate::models::PluginConfig;
use crate::remediators::{self, Remediator, RemediatorFactory};
use crate::settings;
use crate::validators::{self, Validator, ValidatorFactory};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One catalog entry.
#[derive(Clone)]
pub struct Registered<F> {
    pub metadata: PluginMetadata,
    pub factory: F,
    /// Default configuration, overlaid by per-call configuration.
    pub defaults: PluginConfig,
    /// Where the plugin came from (manifest path), `None` for builtins.
    pub origin: Option<String>,
}

impl<F> Registered<F> {
    pub fn new(metadata: PluginMetadata, factory: F) -> Self {
        Self {
            metadata,
            factory,
            defaults: PluginConfig::new(),
            origin: None,
        }
    }

    pub fn with_defaults(mut self, defaults: PluginConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn from_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// A plugin of either kind, ready to be registered.
#[derive(Clone)]
pub enum Plugin {
    Validator(Registered<ValidatorFactory>),
    Remediator(Registered<RemediatorFactory>),
}

impl Plugin {
    pub fn kind(&self) -> PluginKind {
        match self {
            Plugin::Validator(_) => PluginKind::Validator,
            Plugin::Remediator(_) => PluginKind::Remediator,
        }
    }

    pub fn metadata(&self) -> &PluginMetadata {
        match self {
            Plugin::Validator(r) => &r.metadata,
            Plugin::Remediator(r) => &r.metadata,
        }
    }
}

struct Catalog<F> {
    entries: Vec<Registered<F>>,
    by_name: HashMap<String, usize>,
}

impl<F> Default for Catalog<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<F> Catalog<F> {
    fn insert(&mut self, kind: PluginKind, entry: Registered<F>) -> Result<(), RegistryError> {
        let name = entry.metadata.name.clone();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName { kind, name });
        }
        self.by_name.insert(name, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    fn get(&self, kind: PluginKind, name: &str) -> Result<&Registered<F>, RegistryError> {
        self.by_name
            .get(name)
            .and_then(|&i| self.entries.get(i))
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    fn list(&self, filter: &PluginFilter) -> Vec<PluginMetadata> {
        self.entries
            .iter()
            .filter(|e| filter.matches(&e.metadata))
            .map(|e| e.metadata.clone())
            .collect()
    }
}

#[derive(Default)]
pub struct Registry {
    validators: Catalog<ValidatorFactory>,
    remediators: Catalog<RemediatorFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin validator and remediator.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for (meta, make) in validators::builtin() {
            // Names are unique within each builtin list.
            let _ = reg.register(Plugin::Validator(Registered::new(meta, make)));
        }
        for (meta, make) in remediators::builtin() {
            let _ = reg.register(Plugin::Remediator(Registered::new(meta, make)));
        }
        reg
    }

    /// Add one plugin. The first registration of a name wins.
    pub fn register(&mut self, plugin: Plugin) -> Result<(), RegistryError> {
        let kind = plugin.kind();
        match plugin {
            Plugin::Validator(entry) => self.validators.insert(kind, entry),
            Plugin::Remediator(entry) => self.remediators.insert(kind, entry),
        }
    }

    /// Register every plugin of `kind` that `source` yields. Plugins that
    /// fail to load or collide with an existing name are logged and
    /// skipped. Returns the number registered.
    pub fn discover(&mut self, kind: PluginKind, source: &dyn PluginSource) -> usize {
        self.discover_matching(Some(kind), source)
    }

    /// Like `discover`, for every kind from a single load of `source`, so
    /// each failing plugin is reported once.
    pub fn discover_all(&mut self, source: &dyn PluginSource) -> usize {
        self.discover_matching(None, source)
    }

    fn discover_matching(&mut self, kind: Option<PluginKind>, source: &dyn PluginSource) -> usize {
        let mut count = 0usize;
        for loaded in source.load() {
            let plugin = match loaded {
                Ok(p) => p,
                Err(e) => {
                    warn!(source = source.name(), error = %e, "skipping plugin that failed to load");
                    continue;
                }
            };
            if kind.is_some_and(|k| k != plugin.kind()) {
                continue;
            }
            let name = plugin.metadata().name.clone();
            let plugin_kind = plugin.kind();
            match self.register(plugin) {
                Ok(()) => {
                    debug!(source = source.name(), kind = %plugin_kind, plugin = %name, "registered plugin");
                    count += 1;
                }
                Err(e) => warn!(source = source.name(), error = %e, "skipping plugin"),
            }
        }
        count
    }

    pub fn validator_entry(&self, name: &str) -> Result<&Registered<ValidatorFactory>, RegistryError> {
        self.validators.get(PluginKind::Validator, name)
    }

    pub fn remediator_entry(
        &self,
        name: &str,
    ) -> Result<&Registered<RemediatorFactory>, RegistryError> {
        self.remediators.get(PluginKind::Remediator, name)
    }

    /// Instantiate a validator with its defaults overlaid by `overrides`.
    pub fn validator(
        &self,
        name: &str,
        overrides: Option<&PluginConfig>,
    ) -> Result<Arc<dyn Validator>, RegistryError> {
        let entry = self.validator_entry(name)?;
        Ok((entry.factory)(&settings::merge(&entry.defaults, overrides)))
    }

    /// Instantiate a remediator with its defaults overlaid by `overrides`.
    pub fn remediator(
        &self,
        name: &str,
        overrides: Option<&PluginConfig>,
    ) -> Result<Arc<dyn Remediator>, RegistryError> {
        let entry = self.remediator_entry(name)?;
        Ok((entry.factory)(&settings::merge(&entry.defaults, overrides)))
    }

    pub fn contains(&self, kind: PluginKind, name: &str) -> bool {
        match kind {
            PluginKind::Validator => self.validators.by_name.contains_key(name),
            PluginKind::Remediator => self.remediators.by_name.contains_key(name),
        }
    }

    /// Metadata of every plugin of `kind` matching `filter`, in
    /// registration order.
    pub fn list(&self, kind: PluginKind, filter: &PluginFilter) -> Vec<PluginMetadata> {
        match kind {
            PluginKind::Validator => self.validators.list(filter),
            PluginKind::Remediator => self.remediators.list(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Context, ValidationResult};
    use crate::validators::factory;

    struct Constant(f64);

    impl Validator for Constant {
        fn validate(&self, _content: &str, _context: &Context) -> ValidationResult {
            ValidationResult::new(Vec::new(), self.0)
        }
    }

    fn constant(name: &str, score: f64) -> Plugin {
        let meta = PluginMetadata::new(name, "0.1.0", "test");
        Plugin::Validator(Registered::new(meta, factory(move |_| Constant(score))))
    }

    #[test]
    fn test_duplicate_readability_keeps_first_registration() {
        let mut reg = Registry::new();
        reg.register(constant("readability", 11.0)).unwrap();
        let err = reg.register(constant("readability", 99.0)).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateName { kind: PluginKind::Validator, ref name } if name == "readability"
        ));
        let v = reg.validator("readability", None).unwrap();
        assert_eq!(v.validate("", &Context::new()).score, 11.0);
        assert_eq!(reg.list(PluginKind::Validator, &PluginFilter::default()).len(), 1);
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let reg = Registry::builtin();
        assert!(reg.contains(PluginKind::Validator, "inclusive_language"));
        assert!(reg.contains(PluginKind::Remediator, "inclusive_language"));
        assert!(!reg.contains(PluginKind::Remediator, "readability"));
        assert!(matches!(
            reg.remediator("readability", None),
            Err(RegistryError::NotFound { kind: PluginKind::Remediator, .. })
        ));
    }

    #[test]
    fn test_list_filters_by_category_and_tag_in_insertion_order() {
        let reg = Registry::builtin();
        let all: Vec<String> = reg
            .list(PluginKind::Validator, &PluginFilter::default())
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            all,
            vec!["readability", "structure", "grammar", "accessibility", "inclusive_language"]
        );
        let filter = PluginFilter {
            category: Some("Structure".into()),
            tag: None,
        };
        let got = reg.list(PluginKind::Validator, &filter);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "structure");
        let filter = PluginFilter {
            category: None,
            tag: Some("markdown".into()),
        };
        let names: Vec<String> = reg
            .list(PluginKind::Validator, &filter)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["structure", "accessibility"]);
    }

    #[test]
    fn test_defaults_are_overlaid_by_overrides() {
        let mut reg = Registry::new();
        let mut defaults = PluginConfig::new();
        defaults.insert("min_score".into(), serde_json::json!(150));
        let (meta, make) = validators::builtin().remove(0);
        reg.register(Plugin::Validator(Registered::new(meta, make).with_defaults(defaults)))
            .unwrap();
        let text = "The cat sat.";
        let strict = reg.validator("readability", None).unwrap();
        assert!(strict
            .validate(text, &Context::new())
            .issues
            .iter()
            .any(|i| i.kind == "low_readability"));
        let mut ov = PluginConfig::new();
        ov.insert("min_score".into(), serde_json::json!(0));
        let lenient = reg.validator("readability", Some(&ov)).unwrap();
        assert!(lenient.validate(text, &Context::new()).issues.is_empty());
    }

    struct Counted {
        loads: std::cell::Cell<usize>,
    }

    impl PluginSource for Counted {
        fn name(&self) -> &str {
            "counted"
        }

        fn load(&self) -> Vec<Result<Plugin, crate::errors::PluginLoadError>> {
            self.loads.set(self.loads.get() + 1);
            let (meta, make) = remediators::builtin().remove(0);
            vec![
                Ok(constant("steady", 50.0)),
                Err(crate::errors::PluginLoadError::InvalidMetadata {
                    name: "broken".into(),
                    reason: "empty version".into(),
                }),
                Ok(Plugin::Remediator(Registered::new(meta, make))),
            ]
        }
    }

    #[test]
    fn test_discover_all_loads_the_source_once() {
        let source = Counted { loads: std::cell::Cell::new(0) };
        let mut reg = Registry::new();
        assert_eq!(reg.discover_all(&source), 2);
        assert_eq!(source.loads.get(), 1);
        assert!(reg.contains(PluginKind::Validator, "steady"));
        assert_eq!(reg.list(PluginKind::Remediator, &PluginFilter::default()).len(), 1);
        assert_eq!(reg.discover(PluginKind::Validator, &source), 0);
        assert_eq!(source.loads.get(), 2);
    }
}
