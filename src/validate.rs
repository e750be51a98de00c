//! Validation manager: runs a set of validators over one document and
//! combines their results into an `AggregateReport`.
//!
//! - Names are deduplicated; each name gets exactly one slot.
//! - An unknown name yields a `validator_not_found` error in its slot.
//! - Panics and budget overruns yield `validator_failed` /
//!   `validator_timeout` errors; sibling validators are unaffected.
//! - The combined score is the arithmetic mean of all slot scores (failed
//!   slots count as 0). No validators means a score of 100.
//! - Flattened issues are ordered error, warning, info; ties keep the
//!   requested validator order and each validator's detection order.

use crate::errors::UnitError;
use crate::guard;
use crate::models::{
    clamp_score, AggregateReport, Context, PluginConfig, ReportedIssue, Severity, Summary,
    ValidationResult,
};
use crate::registry::Registry;
use crate::settings;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};

pub const DEFAULT_VALIDATORS: &[&str] = &["readability", "structure", "grammar"];

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Used when a call names no validators.
    pub default_validators: Vec<String>,
    /// Wall-clock budget per validator; `None` disables it.
    pub timeout: Option<Duration>,
    /// Run the validators of one call on the rayon pool.
    pub parallel: bool,
    /// Per-validator configuration overlaid on registry defaults.
    pub plugin_config: BTreeMap<String, PluginConfig>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_validators: DEFAULT_VALIDATORS.iter().map(|s| s.to_string()).collect(),
            timeout: Some(Duration::from_millis(5000)),
            parallel: true,
            plugin_config: BTreeMap::new(),
        }
    }
}

pub struct ValidationManager {
    registry: Arc<Registry>,
    config: ValidationConfig,
}

impl ValidationManager {
    pub fn new(registry: Arc<Registry>, config: ValidationConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `content` with `names` (or the configured defaults).
    pub fn validate(
        &self,
        content: &str,
        names: Option<&[String]>,
        context: Option<&Context>,
    ) -> AggregateReport {
        let requested = names
            .map(|n| n.to_vec())
            .unwrap_or_else(|| self.config.default_validators.clone());
        let mut seen = HashSet::new();
        let names: Vec<String> = requested
            .into_iter()
            .filter(|n| seen.insert(n.clone()))
            .collect();

        let span = info_span!("validate", bytes = content.len(), validators = names.len());
        let _enter = span.enter();

        let content: Arc<str> = Arc::from(content);
        let context = Arc::new(context.cloned().unwrap_or_default());
        let run = |name: &String| (name.clone(), self.run_one(name, &content, &context));
        let slots: Vec<(String, ValidationResult)> = if self.config.parallel {
            names.par_iter().map(run).collect()
        } else {
            names.iter().map(run).collect()
        };

        let report = aggregate(slots);
        info!(
            score = report.score,
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            infos = report.summary.infos,
            "validation finished"
        );
        report
    }

    fn run_one(&self, name: &str, content: &Arc<str>, context: &Arc<Context>) -> ValidationResult {
        let entry = match self.registry.validator_entry(name) {
            Ok(e) => e,
            Err(e) => {
                warn!(validator = name, "validator is not registered");
                return ValidationResult::failed("validator_not_found", e.to_string());
            }
        };
        let factory = Arc::clone(&entry.factory);
        let cfg = settings::merge(&entry.defaults, self.config.plugin_config.get(name));
        let (content, context) = (Arc::clone(content), Arc::clone(context));

        let started = Instant::now();
        let outcome = guard::run_contained(name, self.config.timeout, move || {
            factory(&cfg).validate(&content, &context)
        });
        match outcome {
            Ok(mut res) => {
                res.score = clamp_score(res.score);
                debug!(
                    validator = name,
                    issues = res.issues.len(),
                    score = res.score,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "validator finished"
                );
                res
            }
            Err(e) => {
                warn!(validator = name, error = %e, "validator did not complete");
                let kind = match e {
                    UnitError::TimedOut(_) => "validator_timeout",
                    UnitError::Panicked(_) => "validator_failed",
                };
                ValidationResult::failed(kind, format!("validator '{}' {}", name, e))
            }
        }
    }
}

/// Combine per-validator results, given in requested order.
pub fn aggregate(slots: Vec<(String, ValidationResult)>) -> AggregateReport {
    let mut issues = Vec::new();
    let mut summary = Summary::default();
    let mut total = 0.0;
    let mut results = BTreeMap::new();
    for (name, res) in slots {
        for issue in &res.issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
            issues.push(ReportedIssue {
                validator: name.clone(),
                issue: issue.clone(),
            });
        }
        total += res.score;
        results.insert(name, res);
    }
    issues.sort_by_key(|r| r.issue.severity.display_rank());
    summary.validators = results.len();
    let score = if results.is_empty() {
        100.0
    } else {
        total / results.len() as f64
    };
    AggregateReport {
        results,
        score,
        issues,
        summary,
    }
}
