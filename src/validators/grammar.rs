//! Grammar validator.
//!
//! The validator itself only maps findings of a `GrammarChecker` onto
//! issues, one issue per finding with the rule id as `kind`. Hosts with a
//! real spell/grammar service inject it through `GrammarValidator::with_checker`;
//! otherwise `BasicGrammarChecker` provides rule-based checks:
//!
//! - `repeated_word` (warning): "the the".
//! - `missing_space_after_punctuation` (warning): "end.Next", "one,two".
//! - `sentence_case` (info): sentence starts with a lowercase letter.
//! - `repeated_whitespace` (info): two or more spaces inside a line.
//! - `trailing_whitespace` (info).
//! - `article_agreement` (info): "a" before a vowel sound.
//!
//! Score: `100 - 10 * errors - 5 * warnings - 2 * infos`, clamped.

use super::Validator;
use crate::errors::GrammarError;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, Severity, ValidationResult};
use crate::settings;
use crate::text::{self, LineIndex};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const NAME: &str = "grammar";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "grammar")
        .describe("Spelling and grammar findings from a pluggable checker")
        .by("proofkit")
        .tagged(&["grammar", "spelling", "text"])
}

/// One finding of a grammar backend. `offset` is a byte offset into the
/// checked content.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarFinding {
    pub rule: String,
    pub message: String,
    pub severity: Severity,
    pub offset: usize,
    pub replacement: Option<String>,
}

impl GrammarFinding {
    fn new(rule: &str, severity: Severity, offset: usize, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            severity,
            offset,
            replacement: None,
        }
    }

    fn replace_with(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// Spell/grammar checking backend.
pub trait GrammarChecker: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, content: &str) -> Result<Vec<GrammarFinding>, GrammarError>;
}

/// Rule-based checker used when no external backend is injected.
#[derive(Debug, Clone, Default)]
pub struct BasicGrammarChecker {
    disabled: BTreeSet<String>,
}

impl BasicGrammarChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the given rule ids.
    pub fn without_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled.extend(rules.into_iter().map(Into::into));
        self
    }

    fn enabled(&self, rule: &str) -> bool {
        !self.disabled.contains(rule)
    }

    fn check_segment(
        &self,
        segment: &str,
        base: usize,
        patterns: &Patterns,
        out: &mut Vec<GrammarFinding>,
    ) {
        if self.enabled("repeated_word") {
            for rep in text::repeated_words(segment) {
                out.push(
                    GrammarFinding::new(
                        "repeated_word",
                        Severity::Warning,
                        base + rep.second.start,
                        format!("The word '{}' is repeated", rep.word),
                    )
                    .replace_with(rep.word.clone()),
                );
            }
        }
        if self.enabled("missing_space_after_punctuation") {
            for at in text::missing_punctuation_spaces(segment) {
                out.push(GrammarFinding::new(
                    "missing_space_after_punctuation",
                    Severity::Warning,
                    base + at,
                    "Missing space after punctuation".to_string(),
                ));
            }
        }
        if self.enabled("sentence_case") {
            for s in text::sentences(segment) {
                if s.text.chars().next().is_some_and(char::is_lowercase) {
                    out.push(GrammarFinding::new(
                        "sentence_case",
                        Severity::Info,
                        base + s.start,
                        "Sentence does not start with a capital letter".to_string(),
                    ));
                }
            }
        }
        if self.enabled("repeated_whitespace") {
            for run in text::inner_space_runs(segment) {
                out.push(
                    GrammarFinding::new(
                        "repeated_whitespace",
                        Severity::Info,
                        base + run.start,
                        format!("{} consecutive spaces", run.len()),
                    )
                    .replace_with(" "),
                );
            }
        }
        if self.enabled("trailing_whitespace") {
            for m in patterns.trailing.find_iter(segment) {
                out.push(GrammarFinding::new(
                    "trailing_whitespace",
                    Severity::Info,
                    base + m.start(),
                    "Line ends with whitespace".to_string(),
                ));
            }
        }
        if self.enabled("article_agreement") {
            for caps in patterns.article.captures_iter(segment) {
                let (Some(article), Some(word)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let lower = word.as_str().to_lowercase();
                if ["one", "once", "eu", "ewe", "uni", "use"]
                    .iter()
                    .any(|p| lower.starts_with(p))
                {
                    continue;
                }
                let fixed = if article.as_str() == "A" { "An" } else { "an" };
                out.push(
                    GrammarFinding::new(
                        "article_agreement",
                        Severity::Info,
                        base + article.start(),
                        format!("Use '{}' before '{}'", fixed, word.as_str()),
                    )
                    .replace_with(fixed),
                );
            }
        }
    }
}

struct Patterns {
    trailing: Regex,
    article: Regex,
}

impl Patterns {
    fn compile(backend: &str) -> Result<Self, GrammarError> {
        let build = |p: &str| {
            Regex::new(p).map_err(|e| GrammarError::Failed {
                backend: backend.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            trailing: build(r"(?m)[ \t]+$")?,
            article: build(r"\b([Aa])[ \t]+([AaEeIiOo][A-Za-z]*)")?,
        })
    }
}

impl GrammarChecker for BasicGrammarChecker {
    fn name(&self) -> &str {
        "basic"
    }

    fn check(&self, content: &str) -> Result<Vec<GrammarFinding>, GrammarError> {
        let patterns = Patterns::compile(self.name())?;
        let mut out = Vec::new();
        for range in text::prose_ranges(content) {
            self.check_segment(&content[range.clone()], range.start, &patterns, &mut out);
        }
        out.sort_by_key(|f| f.offset);
        Ok(out)
    }
}

pub struct GrammarValidator {
    checker: Arc<dyn GrammarChecker>,
}

impl GrammarValidator {
    pub fn with_checker(checker: Arc<dyn GrammarChecker>) -> Self {
        Self { checker }
    }

    /// Builtin checker; `disabled_rules` lists rule ids to skip.
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let disabled: Vec<String> = settings::read(cfg, "disabled_rules", Vec::new());
        Self::with_checker(Arc::new(BasicGrammarChecker::new().without_rules(disabled)))
    }
}

impl Validator for GrammarValidator {
    fn validate(&self, content: &str, _context: &Context) -> ValidationResult {
        let findings = match self.checker.check(content) {
            Ok(f) => f,
            Err(e) => {
                return ValidationResult::failed("grammar_check_failed", e.to_string())
                    .with_metadata("backend", self.checker.name())
            }
        };
        let index = LineIndex::new(content);
        let count = findings.len();
        let issues = findings
            .into_iter()
            .map(|f| {
                let mut issue = Issue::new(f.rule, f.severity, f.message).at(index.locate(f.offset));
                if let Some(r) = f.replacement {
                    issue = issue.with_suggestion(format!("Replace with '{}'", r));
                }
                issue
            })
            .collect();
        ValidationResult::with_penalties(issues, 10.0, 5.0, 2.0)
            .with_metadata("backend", self.checker.name())
            .with_metadata("findings", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(content: &str) -> Vec<String> {
        BasicGrammarChecker::new()
            .check(content)
            .unwrap()
            .into_iter()
            .map(|f| f.rule)
            .collect()
    }

    struct Fixed(Vec<GrammarFinding>);

    impl GrammarChecker for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn check(&self, _content: &str) -> Result<Vec<GrammarFinding>, GrammarError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl GrammarChecker for Down {
        fn name(&self) -> &str {
            "remote"
        }
        fn check(&self, _content: &str) -> Result<Vec<GrammarFinding>, GrammarError> {
            Err(GrammarError::Unavailable {
                backend: "remote".into(),
                reason: "connection refused".into(),
            })
        }
    }

    #[test]
    fn test_basic_rules_fire_individually() {
        assert_eq!(rules("We saw the the cat."), vec!["repeated_word"]);
        assert_eq!(rules("the cat sat. It ran."), vec!["sentence_case"]);
        assert_eq!(rules("Two  spaces here."), vec!["repeated_whitespace"]);
        assert_eq!(rules("Line one.   \nLine two."), vec!["trailing_whitespace"]);
        assert_eq!(rules("It ended.Then more."), vec!["missing_space_after_punctuation"]);
        assert_eq!(rules("He ate a apple and a one-off snack."), vec!["article_agreement"]);
    }

    #[test]
    fn test_clean_text_and_code_fences_have_no_findings() {
        assert!(rules("The cat sat on the mat. It was happy.").is_empty());
        assert!(rules("Intro text.\n```\nthe the  code\n```\n").is_empty());
    }

    #[test]
    fn test_repeated_word_offset_points_at_second_occurrence() {
        let found = BasicGrammarChecker::new().check("We saw the the cat.").unwrap();
        assert_eq!(found[0].offset, 11);
        assert_eq!(found[0].replacement.as_deref(), Some("the"));
    }

    #[test]
    fn test_findings_map_one_to_one_onto_issues() {
        let findings = vec![
            GrammarFinding::new("spelling", Severity::Error, 4, "Unknown word 'teh'".into())
                .replace_with("the"),
            GrammarFinding::new("style", Severity::Info, 0, "Consider rewording".into()),
        ];
        let v = GrammarValidator::with_checker(Arc::new(Fixed(findings)));
        let res = v.validate("Fix teh word", &Context::new());
        assert_eq!(res.issues.len(), 2);
        assert_eq!(res.issues[0].kind, "spelling");
        assert_eq!(res.issues[0].location.unwrap().column, 5);
        assert_eq!(res.issues[0].suggestion.as_deref(), Some("Replace with 'the'"));
        assert_eq!(res.score, 88.0);
        assert_eq!(res.metadata["backend"], "fixed");
    }

    #[test]
    fn test_checker_failure_becomes_single_error() {
        let v = GrammarValidator::with_checker(Arc::new(Down));
        let res = v.validate("Anything.", &Context::new());
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.issues[0].kind, "grammar_check_failed");
        assert_eq!(res.issues[0].severity, Severity::Error);
        assert!(res.issues[0].message.contains("connection refused"));
        assert_eq!(res.score, 0.0);
    }

    #[test]
    fn test_rules_can_be_disabled_from_config() {
        let cfg = json!({"disabled_rules": ["sentence_case"]});
        let v = GrammarValidator::from_config(cfg.as_object().unwrap());
        let res = v.validate("lowercase start here.", &Context::new());
        assert!(res.issues.is_empty());
        assert_eq!(res.score, 100.0);
    }
}
