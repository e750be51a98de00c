//! Remediators: rewrite content to address issues and describe what they
//! changed. Repeated application converges; a second run over a
//! remediator's own output records no changes.
//!
//! Builtins:
//! - `format_corrector`: whitespace, punctuation spacing, headings, repeats.
//! - `inclusive_language`: replaces terms from the inclusive language table.
//! - `sentence_splitter`: splits long sentences at conjunctions.

pub mod format_corrector;
pub mod inclusive;
pub mod sentence_splitter;

use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, RemediationResult};
use std::sync::Arc;

/// Capability implemented by every remediator.
///
/// On failure the result carries `success = false`, an `error` message and
/// the input content unchanged.
pub trait Remediator: Send + Sync {
    fn remediate(&self, content: &str, issues: &[Issue], context: &Context) -> RemediationResult;
}

/// Builds a remediator from its merged configuration.
pub type RemediatorFactory = Arc<dyn Fn(&PluginConfig) -> Arc<dyn Remediator> + Send + Sync>;

/// Wrap a typed constructor into a `RemediatorFactory`.
pub fn factory<R, F>(build: F) -> RemediatorFactory
where
    R: Remediator + 'static,
    F: Fn(&PluginConfig) -> R + Send + Sync + 'static,
{
    Arc::new(move |cfg: &PluginConfig| Arc::new(build(cfg)) as Arc<dyn Remediator>)
}

/// Compile-time list of builtin remediator implementations.
pub fn builtin() -> Vec<(PluginMetadata, RemediatorFactory)> {
    vec![
        (
            format_corrector::metadata(),
            factory(format_corrector::FormatCorrector::from_config),
        ),
        (
            inclusive::metadata(),
            factory(inclusive::InclusiveLanguageRemediator::from_config),
        ),
        (
            sentence_splitter::metadata(),
            factory(sentence_splitter::SentenceSplitter::from_config),
        ),
    ]
}

/// Order used when remediators are inferred from issues: local formatting
/// first, word substitutions next, sentence restructuring last.
pub const REMEDIATION_ORDER: &[&str] = &[
    format_corrector::NAME,
    inclusive::NAME,
    sentence_splitter::NAME,
];

/// Remediator that addresses a given issue kind, if any.
pub fn remediator_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "long_sentence" | "low_readability" => Some(sentence_splitter::NAME),
        "trailing_whitespace"
        | "repeated_whitespace"
        | "missing_space_after_punctuation"
        | "heading_format"
        | "excess_blank_lines"
        | "repeated_word" => Some(format_corrector::NAME),
        "non_inclusive_term" => Some(inclusive::NAME),
        _ => None,
    }
}

/// Remediator names for a set of issues, deduplicated, in
/// `REMEDIATION_ORDER`.
pub fn infer_from_issues(issues: &[Issue]) -> Vec<String> {
    let wanted: Vec<&str> = issues
        .iter()
        .filter_map(|i| remediator_for_kind(&i.kind))
        .collect();
    REMEDIATION_ORDER
        .iter()
        .filter(|name| wanted.contains(*name))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_follows_fixed_order_and_ignores_unmapped_kinds() {
        let issues = vec![
            Issue::info("long_sentence", "x"),
            Issue::warning("missing_heading", "x"),
            Issue::info("trailing_whitespace", "x"),
            Issue::info("repeated_word", "x"),
        ];
        assert_eq!(
            infer_from_issues(&issues),
            vec!["format_corrector".to_string(), "sentence_splitter".to_string()]
        );
        assert!(infer_from_issues(&[Issue::error("validator_not_found", "x")]).is_empty());
    }

    #[test]
    fn test_builtins_match_remediation_order() {
        let names: Vec<String> = builtin().into_iter().map(|(m, _)| m.name).collect();
        assert_eq!(names, REMEDIATION_ORDER.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_builtin_leaves_empty_content_alone() {
        for (meta, make) in builtin() {
            let r = make(&PluginConfig::new());
            let res = r.remediate("", &[], &Context::new());
            assert!(res.success, "{}", meta.name);
            assert_eq!(res.content, "");
            assert!(res.changes_made.is_empty());
        }
    }
}
