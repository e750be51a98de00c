//! Replaces terms from the inclusive language table with their suggested
//! alternatives. Capitalization of the first letter is kept; every
//! replacement is logged as its own change.

use super::Remediator;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, RemediationResult};
use crate::validators::inclusive::TermMatcher;

pub const NAME: &str = "inclusive_language";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "inclusive-language")
        .describe("Replaces terms that have more inclusive alternatives")
        .by("proofkit")
        .tagged(&["inclusive", "style", "rewrite"])
}

pub struct InclusiveLanguageRemediator {
    cfg: PluginConfig,
}

impl InclusiveLanguageRemediator {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self { cfg: cfg.clone() }
    }
}

impl Remediator for InclusiveLanguageRemediator {
    fn remediate(&self, content: &str, _issues: &[Issue], _context: &Context) -> RemediationResult {
        let matcher = match TermMatcher::from_config(&self.cfg) {
            Ok(m) => m,
            Err(e) => return RemediationResult::failed(content, format!("term pattern: {}", e)),
        };
        let found = matcher.find_terms(content);
        if found.is_empty() {
            return RemediationResult::unchanged(content);
        }

        let mut out = String::with_capacity(content.len());
        let mut changes = Vec::with_capacity(found.len());
        let mut cursor = 0usize;
        for term in &found {
            let with = term.cased_replacement();
            out.push_str(&content[cursor..term.start]);
            out.push_str(&with);
            cursor = term.end;
            changes.push(format!("Replaced '{}' with '{}'", term.found, with));
        }
        out.push_str(&content[cursor..]);
        RemediationResult::changed(out, changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fix(content: &str) -> RemediationResult {
        InclusiveLanguageRemediator::from_config(&PluginConfig::new()).remediate(
            content,
            &[],
            &Context::new(),
        )
    }

    #[test]
    fn test_terms_are_replaced_keeping_capitalization() {
        let res = fix("Blacklist the host. Ask the chairman about the master branch.");
        assert_eq!(
            res.content,
            "Denylist the host. Ask the chairperson about the main branch."
        );
        assert_eq!(
            res.changes_made,
            vec![
                "Replaced 'Blacklist' with 'Denylist'",
                "Replaced 'chairman' with 'chairperson'",
                "Replaced 'master branch' with 'main branch'",
            ]
        );
        assert!(fix(&res.content).changes_made.is_empty());
    }

    #[test]
    fn test_ignored_terms_stay() {
        let cfg = json!({"ignore": ["lame"]});
        let r = InclusiveLanguageRemediator::from_config(cfg.as_object().unwrap());
        let res = r.remediate("A lame excuse.", &[], &Context::new());
        assert!(res.changes_made.is_empty());
        assert_eq!(res.content, "A lame excuse.");
    }

    #[test]
    fn test_link_targets_survive_replacement() {
        let res = fix("See [the blacklist](https://example.com/blacklist/setup) for details.\n");
        assert_eq!(
            res.content,
            "See [the denylist](https://example.com/blacklist/setup) for details.\n"
        );
        assert_eq!(res.changes_made, vec!["Replaced 'blacklist' with 'denylist'"]);
        let code = "Run `grep whitelist` first.\n";
        assert_eq!(fix(code).content, code);
    }
}
