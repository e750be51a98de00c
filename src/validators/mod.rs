//! Validators: stateless analyzers that inspect content and report issues
//! plus a quality score. They never modify content.
//!
//! Builtins:
//! - `readability`: Flesch Reading Ease and long sentences.
//! - `structure`: headings, heading depth, introduction/conclusion.
//! - `grammar`: findings of an injected `GrammarChecker`.
//! - `accessibility`: image alt text, link text, heading level jumps.
//! - `inclusive_language`: terms with more inclusive alternatives.

pub mod accessibility;
pub mod grammar;
pub mod inclusive;
pub mod readability;
pub mod structure;

use crate::models::plugin::PluginMetadata;
use crate::models::{Context, PluginConfig, ValidationResult};
use regex::Regex;
use std::sync::Arc;

/// Capability implemented by every validator.
///
/// Implementations must not panic on any UTF-8 input; internal failures are
/// reported as a `ValidationResult` with a single error issue and score 0.
pub trait Validator: Send + Sync {
    fn validate(&self, content: &str, context: &Context) -> ValidationResult;
}

/// Builds a validator from its merged configuration.
pub type ValidatorFactory = Arc<dyn Fn(&PluginConfig) -> Arc<dyn Validator> + Send + Sync>;

/// Wrap a typed constructor into a `ValidatorFactory`.
pub fn factory<V, F>(build: F) -> ValidatorFactory
where
    V: Validator + 'static,
    F: Fn(&PluginConfig) -> V + Send + Sync + 'static,
{
    Arc::new(move |cfg: &PluginConfig| Arc::new(build(cfg)) as Arc<dyn Validator>)
}

/// Compile-time list of builtin validator implementations.
pub fn builtin() -> Vec<(PluginMetadata, ValidatorFactory)> {
    vec![
        (
            readability::metadata(),
            factory(readability::ReadabilityValidator::from_config),
        ),
        (
            structure::metadata(),
            factory(structure::StructureValidator::from_config),
        ),
        (
            grammar::metadata(),
            factory(grammar::GrammarValidator::from_config),
        ),
        (
            accessibility::metadata(),
            factory(accessibility::AccessibilityValidator::from_config),
        ),
        (
            inclusive::metadata(),
            factory(inclusive::InclusiveLanguageValidator::from_config),
        ),
    ]
}

/// Compile a pattern or produce the validator failure shape.
pub(crate) fn compile(kind: &str, pattern: &str) -> Result<Regex, ValidationResult> {
    Regex::new(pattern).map_err(|e| {
        ValidationResult::failed(kind, format!("internal pattern failed to compile: {}", e))
    })
}
