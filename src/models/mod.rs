//! Shared data models for validation and remediation outputs and plugin
//! manifests.

pub mod manifest;
pub mod plugin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied hints (target audience, pedagogy style, ...).
pub type Context = Map<String, Json>;

/// Schema-less per-plugin configuration, keyed by option name.
pub type PluginConfig = Map<String, Json>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Issue severity. Orders as `Info < Warning < Error`.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Rank used when sorting for display: errors first.
    pub fn display_rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// 1-based line and column (column counted in characters).
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single finding produced by a validator.
pub struct Issue {
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(kind: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            message: message.into(),
            location: None,
            suggestion: None,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn info(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, message)
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Output of one validator run.
pub struct ValidationResult {
    pub issues: Vec<Issue>,
    /// Self-reported quality estimate in `[0, 100]`. Not calibrated across
    /// validators.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Json>,
}

impl ValidationResult {
    pub fn new(issues: Vec<Issue>, score: f64) -> Self {
        Self {
            issues,
            score: clamp_score(score),
            metadata: Map::new(),
        }
    }

    /// Failure shape: a single error issue and a zero score.
    pub fn failed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::error(kind, message)], 0.0)
    }

    /// Score computed by deducting a fixed penalty per issue severity from 100.
    pub fn with_penalties(issues: Vec<Issue>, error: f64, warning: f64, info: f64) -> Self {
        let deducted: f64 = issues
            .iter()
            .map(|is| match is.severity {
                Severity::Error => error,
                Severity::Warning => warning,
                Severity::Info => info,
            })
            .sum();
        Self::new(issues, 100.0 - deducted)
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Json>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Force a score into `[0, 100]`; NaN becomes 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// An issue in the flattened report, attributed to its validator.
pub struct ReportedIssue {
    pub validator: String,
    #[serde(flatten)]
    pub issue: Issue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Severity counts used by printers and exit codes.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub validators: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Combined outcome of running several validators over one document.
pub struct AggregateReport {
    pub results: BTreeMap<String, ValidationResult>,
    /// Arithmetic mean of every slot's score (failed slots count as 0).
    pub score: f64,
    pub issues: Vec<ReportedIssue>,
    pub summary: Summary,
}

impl AggregateReport {
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Issues without validator attribution, in report order.
    pub fn flat_issues(&self) -> Vec<Issue> {
        self.issues.iter().map(|r| r.issue.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Output of one remediator run.
pub struct RemediationResult {
    pub content: String,
    pub changes_made: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemediationResult {
    pub fn changed(content: String, changes_made: Vec<String>) -> Self {
        Self {
            content,
            changes_made,
            success: true,
            error: None,
        }
    }

    pub fn unchanged(content: &str) -> Self {
        Self::changed(content.to_string(), Vec::new())
    }

    /// Failure shape: input returned untouched.
    pub fn failed(content: &str, error: impl Into<String>) -> Self {
        Self {
            content: content.to_string(),
            changes_made: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One attempted remediator in a remediation chain.
pub struct RemediationStep {
    pub remediator: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Final content and change log of a remediation chain.
pub struct RemediationOutcome {
    pub final_content: String,
    pub changes: Vec<String>,
    pub remediators_applied: Vec<String>,
    pub steps: Vec<RemediationStep>,
}

impl RemediationOutcome {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_orders_error_above_warning_above_info() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        let mut v = vec![Severity::Info, Severity::Error, Severity::Warning];
        v.sort_by_key(|s| s.display_rank());
        assert_eq!(v, vec![Severity::Error, Severity::Warning, Severity::Info]);
    }

    #[test]
    fn test_issue_serializes_lowercase_severity_and_skips_empty_fields() {
        let is = Issue::warning("long_sentence", "too long");
        let out = serde_json::to_value(&is).unwrap();
        assert_eq!(out["severity"], "warning");
        assert!(out.get("location").is_none());
        assert!(out.get("suggestion").is_none());
    }

    #[test]
    fn test_penalty_score_is_clamped() {
        let issues = (0..30).map(|_| Issue::error("x", "y")).collect();
        let res = ValidationResult::with_penalties(issues, 10.0, 5.0, 1.0);
        assert_eq!(res.score, 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
    }

    #[test]
    fn test_failed_remediation_keeps_input() {
        let res = RemediationResult::failed("abc", "boom");
        assert_eq!(res.content, "abc");
        assert!(!res.success);
        assert!(res.changes_made.is_empty());
        assert_eq!(res.error.as_deref(), Some("boom"));
    }
}
