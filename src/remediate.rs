//! Remediation manager: threads content through a sequence of remediators.
//!
//! Remediators of one call always run one after another; each sees the
//! previous output. When no names are given they are inferred from the
//! issue kinds (see `remediators::remediator_for_kind`) and run in
//! `remediators::REMEDIATION_ORDER`. Unknown names are skipped. A step that
//! fails (reported failure, panic, timeout, or empty output for non-empty
//! input) passes its input through unchanged and the chain continues.

use crate::guard;
use crate::models::{Context, Issue, PluginConfig, RemediationOutcome, RemediationResult, RemediationStep};
use crate::registry::Registry;
use crate::remediators;
use crate::settings;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn};

#[derive(Debug, Clone)]
pub struct RemediationConfig {
    /// Wall-clock budget per remediator; `None` disables it.
    pub timeout: Option<Duration>,
    /// Per-remediator configuration overlaid on registry defaults.
    pub plugin_config: BTreeMap<String, PluginConfig>,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_millis(5000)),
            plugin_config: BTreeMap::new(),
        }
    }
}

pub struct RemediationManager {
    registry: Arc<Registry>,
    config: RemediationConfig,
}

impl RemediationManager {
    pub fn new(registry: Arc<Registry>, config: RemediationConfig) -> Self {
        Self { registry, config }
    }

    pub fn remediate(
        &self,
        content: &str,
        issues: &[Issue],
        names: Option<&[String]>,
        context: Option<&Context>,
    ) -> RemediationOutcome {
        let names = match names {
            Some(n) => n.to_vec(),
            None => remediators::infer_from_issues(issues),
        };
        let span = info_span!("remediate", bytes = content.len(), remediators = names.len());
        let _enter = span.enter();

        let issues: Arc<Vec<Issue>> = Arc::new(issues.to_vec());
        let context = Arc::new(context.cloned().unwrap_or_default());
        let mut current = content.to_string();
        let mut changes = Vec::new();
        let mut applied = Vec::new();
        let mut steps = Vec::new();

        for name in names {
            let entry = match self.registry.remediator_entry(&name) {
                Ok(e) => e,
                Err(e) => {
                    warn!(remediator = %name, error = %e, "skipping unknown remediator");
                    continue;
                }
            };
            let factory = Arc::clone(&entry.factory);
            let cfg = settings::merge(&entry.defaults, self.config.plugin_config.get(&name));
            let input: Arc<str> = Arc::from(current.as_str());
            let (issues, context) = (Arc::clone(&issues), Arc::clone(&context));

            let outcome = guard::run_contained(&name, self.config.timeout, move || {
                factory(&cfg).remediate(&input, &issues, &context)
            });
            let result = match outcome {
                Ok(res) => check_output(&current, res),
                Err(e) => RemediationResult::failed(&current, format!("remediator {}", e)),
            };

            if result.success {
                debug!(remediator = %name, changes = result.changes_made.len(), "remediator finished");
                changes.extend(result.changes_made.iter().cloned());
                steps.push(RemediationStep {
                    remediator: name.clone(),
                    success: true,
                    error: None,
                    changes: result.changes_made,
                });
                applied.push(name);
                current = result.content;
            } else {
                warn!(remediator = %name, error = ?result.error, "remediator failed; content passed through");
                steps.push(RemediationStep {
                    remediator: name,
                    success: false,
                    error: result.error,
                    changes: Vec::new(),
                });
            }
        }

        info!(applied = applied.len(), changes = changes.len(), "remediation finished");
        RemediationOutcome {
            final_content: current,
            changes,
            remediators_applied: applied,
            steps,
        }
    }
}

/// Reject results that break the remediator contract.
fn check_output(input: &str, res: RemediationResult) -> RemediationResult {
    if !res.success {
        // A failed step never contributes content, whatever it returned.
        return RemediationResult::failed(
            input,
            res.error.unwrap_or_else(|| "remediator reported failure".to_string()),
        );
    }
    if res.content.is_empty() && !input.is_empty() {
        return RemediationResult::failed(input, "remediator returned empty content");
    }
    res
}
