//! Inclusive language validator.
//!
//! Flags terms from a fixed table that have a widely used, more inclusive
//! alternative. The same table and matcher back the `inclusive_language`
//! remediator. Option `ignore` lists table terms to leave alone.

use super::Validator;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, ValidationResult};
use crate::settings;
use crate::text::{self, LineIndex};
use regex::Regex;

pub const NAME: &str = "inclusive_language";

/// Term and its suggested replacement, lowercase.
pub const TERMS: &[(&str, &str)] = &[
    ("whitelist", "allowlist"),
    ("whitelists", "allowlists"),
    ("whitelisted", "allowlisted"),
    ("blacklist", "denylist"),
    ("blacklists", "denylists"),
    ("blacklisted", "denylisted"),
    ("master branch", "main branch"),
    ("slave", "replica"),
    ("slaves", "replicas"),
    ("manpower", "workforce"),
    ("mankind", "humankind"),
    ("man-hours", "person-hours"),
    ("chairman", "chairperson"),
    ("policeman", "police officer"),
    ("fireman", "firefighter"),
    ("you guys", "you all"),
    ("sanity check", "quick check"),
    ("dummy value", "placeholder value"),
    ("crazy", "surprising"),
    ("lame", "weak"),
    ("grandfathered", "legacy"),
];

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "inclusive-language")
        .describe("Terms with more inclusive alternatives")
        .by("proofkit")
        .tagged(&["inclusive", "style", "text"])
}

/// One occurrence of a table term in content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub start: usize,
    pub end: usize,
    pub found: String,
    pub replacement: &'static str,
}

impl TermMatch {
    /// Replacement with the capitalization of the first letter carried over.
    pub fn cased_replacement(&self) -> String {
        if self.found.chars().next().is_some_and(char::is_uppercase) {
            text::capitalize_first(self.replacement)
        } else {
            self.replacement.to_string()
        }
    }
}

/// Case-insensitive matcher over the whole table, longest terms first.
/// Inline code, link destinations, autolinks and bare URLs are never
/// matched: rewriting them would break the reference.
pub struct TermMatcher {
    re: Regex,
    literal: Regex,
    ignore: Vec<String>,
}

impl TermMatcher {
    pub fn new(ignore: Vec<String>) -> Result<Self, regex::Error> {
        let mut terms: Vec<&str> = TERMS.iter().map(|(t, _)| *t).collect();
        terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
        let alternation = terms
            .iter()
            .map(|t| regex::escape(t).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;
        let literal = Regex::new(r"`+[^`\n]*`+|\]\([^)\n]*\)|<[^<>\s]+>|(?:https?://|www\.)[^\s<>()\[\]]+")?;
        let ignore = ignore.iter().map(|t| t.trim().to_lowercase()).collect();
        Ok(Self { re, literal, ignore })
    }

    pub fn from_config(cfg: &PluginConfig) -> Result<Self, regex::Error> {
        Self::new(settings::read(cfg, "ignore", Vec::new()))
    }

    /// Occurrences in prose, in document order.
    pub fn find_terms(&self, content: &str) -> Vec<TermMatch> {
        let mut out = Vec::new();
        for range in text::prose_ranges(content) {
            let segment = &content[range.clone()];
            let literals: Vec<_> = self.literal.find_iter(segment).map(|m| m.range()).collect();
            for m in self.re.find_iter(segment) {
                if literals.iter().any(|l| l.start < m.end() && m.start() < l.end) {
                    continue;
                }
                let key = m
                    .as_str()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                if self.ignore.contains(&key) {
                    continue;
                }
                let Some(&(_, replacement)) = TERMS.iter().find(|(t, _)| *t == key) else {
                    continue;
                };
                out.push(TermMatch {
                    start: range.start + m.start(),
                    end: range.start + m.end(),
                    found: m.as_str().to_string(),
                    replacement,
                });
            }
        }
        out
    }
}

pub struct InclusiveLanguageValidator {
    cfg: PluginConfig,
}

impl InclusiveLanguageValidator {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Validator for InclusiveLanguageValidator {
    fn validate(&self, content: &str, _context: &Context) -> ValidationResult {
        let matcher = match TermMatcher::from_config(&self.cfg) {
            Ok(m) => m,
            Err(e) => {
                return ValidationResult::failed(
                    "inclusive_language_failed",
                    format!("term pattern failed to compile: {}", e),
                )
            }
        };
        let index = LineIndex::new(content);
        let issues: Vec<Issue> = matcher
            .find_terms(content)
            .into_iter()
            .map(|t| {
                Issue::warning(
                    "non_inclusive_term",
                    format!("'{}' has a more inclusive alternative", t.found),
                )
                .at(index.locate(t.start))
                .with_suggestion(format!("Use '{}'", t.cased_replacement()))
            })
            .collect();
        let count = issues.len();
        ValidationResult::new(issues, 100.0 - 5.0 * count as f64).with_metadata("terms", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(content: &str) -> ValidationResult {
        InclusiveLanguageValidator::from_config(&PluginConfig::new()).validate(content, &Context::new())
    }

    #[test]
    fn test_terms_are_flagged_with_alternatives() {
        let res = run("Add the host to the Whitelist.\nMerge into the master   branch.");
        assert_eq!(res.issues.len(), 2);
        assert!(res.issues.iter().all(|i| i.kind == "non_inclusive_term"));
        assert_eq!(res.issues[0].suggestion.as_deref(), Some("Use 'Allowlist'"));
        assert_eq!(res.issues[0].location.unwrap().column, 21);
        assert_eq!(res.issues[1].suggestion.as_deref(), Some("Use 'main branch'"));
        assert_eq!(res.issues[1].location.unwrap().line, 2);
        assert_eq!(res.score, 90.0);
    }

    #[test]
    fn test_longest_form_and_word_boundaries_win() {
        let matcher = TermMatcher::new(Vec::new()).unwrap();
        let found = matcher.find_terms("They whitelisted it. Blameless flames.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].found, "whitelisted");
        assert_eq!(found[0].replacement, "allowlisted");
    }

    #[test]
    fn test_ignored_terms_and_code_are_skipped() {
        let cfg = json!({"ignore": ["crazy"]});
        let v = InclusiveLanguageValidator::from_config(cfg.as_object().unwrap());
        let res = v.validate("A crazy idea.\n```\nslave = 1\n```\n", &Context::new());
        assert!(res.issues.is_empty());
        assert_eq!(res.score, 100.0);
    }

    #[test]
    fn test_links_urls_and_inline_code_are_left_alone() {
        let matcher = TermMatcher::new(Vec::new()).unwrap();
        for content in [
            "See [the docs](https://example.com/blacklist/setup) for details.",
            "Open <https://example.com/whitelist> now.",
            "Visit https://example.com/slave/status or www.example.com/blacklist today.",
            "Set `whitelist = true` and ``master branch`` in the file.",
        ] {
            assert!(matcher.find_terms(content).is_empty(), "{}", content);
        }
        let found = matcher.find_terms("The [blacklist](https://example.com/blacklist) page.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, 5);
    }
}
