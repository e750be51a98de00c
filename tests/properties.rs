use proofkit::models::plugin::{PluginFilter, PluginKind};
use proofkit::models::Severity;
use proofkit::registry::Registry;
use proofkit::remediate::{RemediationConfig, RemediationManager};
use proofkit::validate::{ValidationConfig, ValidationManager};
use proptest::prelude::*;
use std::sync::Arc;

fn registry() -> Arc<Registry> {
    Arc::new(Registry::builtin())
}

fn all_names(kind: PluginKind) -> Vec<String> {
    Registry::builtin()
        .list(kind, &PluginFilter::default())
        .into_iter()
        .map(|m| m.name)
        .collect()
}

/// Markdown-ish documents: headings, prose with conjunctions, odd spacing.
fn document() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        Just("the".to_string()),
        Just("and".to_string()),
        Just("but".to_string()),
        Just("or".to_string()),
        Just("whitelist".to_string()),
        Just("word".to_string()),
        Just("Dr.".to_string()),
        Just("click here".to_string()),
        "[a-z]{1,9}",
    ];
    let sep = prop_oneof![
        Just(" ".to_string()),
        Just("  ".to_string()),
        Just(", ".to_string()),
        Just(". ".to_string()),
        Just("\n".to_string()),
        Just("\n\n\n".to_string()),
        Just("\n# ".to_string()),
        Just("\n###".to_string()),
    ];
    prop::collection::vec((token, sep), 0..80)
        .prop_map(|parts| parts.into_iter().map(|(t, s)| t + &s).collect())
}

/// Prose made of long sentences built from lowercase words and conjunctions.
fn prose() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        3 => "[a-z]{2,8}",
        1 => Just("and".to_string()),
        1 => Just("but".to_string()),
        1 => Just("or".to_string()),
    ];
    let sentence = prop::collection::vec(word, 1..60).prop_map(|ws| {
        let mut s = ws.join(" ");
        s.push('.');
        s
    });
    prop::collection::vec(sentence, 1..4).prop_map(|ss| ss.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_every_validator_fills_one_slot_in_range(doc in document()) {
        let manager = ValidationManager::new(registry(), ValidationConfig::default());
        for name in all_names(PluginKind::Validator) {
            let report = manager.validate(&doc, Some(std::slice::from_ref(&name)), None);
            prop_assert_eq!(report.results.len(), 1);
            let score = report.results[&name].score;
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert!((0.0..=100.0).contains(&report.score));
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(doc in any::<String>()) {
        let manager = ValidationManager::new(registry(), ValidationConfig::default());
        let mut names = all_names(PluginKind::Validator);
        names.push("nonexistent".to_string());
        let report = manager.validate(&doc, Some(names.as_slice()), None);
        let missing = &report.results["nonexistent"];
        prop_assert_eq!(missing.issues.len(), 1);
        prop_assert_eq!(missing.issues[0].severity, Severity::Error);
        for slot in report.results.values() {
            prop_assert!(slot.issues.iter().all(|i| i.kind != "validator_failed"));
        }
    }

    #[test]
    fn prop_flattened_issues_are_severity_ordered(doc in document()) {
        let manager = ValidationManager::new(registry(), ValidationConfig::default());
        let names = all_names(PluginKind::Validator);
        let report = manager.validate(&doc, Some(names.as_slice()), None);
        let ranks: Vec<u8> = report.issues.iter().map(|r| r.issue.severity.display_rank()).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_remediation_keeps_non_empty_content(doc in document().prop_filter("non-empty", |d| !d.is_empty())) {
        let manager = RemediationManager::new(registry(), RemediationConfig::default());
        let names = all_names(PluginKind::Remediator);
        let out = manager.remediate(&doc, &[], Some(names.as_slice()), None);
        prop_assert!(!out.final_content.is_empty());
        prop_assert!(out.steps.iter().all(|s| s.success));
    }

    #[test]
    fn prop_sentence_splitter_converges(doc in prose()) {
        let manager = RemediationManager::new(registry(), RemediationConfig::default());
        let names = vec!["sentence_splitter".to_string()];
        let first = manager.remediate(&doc, &[], Some(names.as_slice()), None);
        let second = manager.remediate(&first.final_content, &[], Some(names.as_slice()), None);
        prop_assert!(second.changes.is_empty());
        prop_assert_eq!(second.final_content, first.final_content);
    }
}
