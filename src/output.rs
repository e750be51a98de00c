//! Output rendering for check, fix, and plugins commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::models::plugin::{PluginKind, PluginMetadata};
use crate::models::{AggregateReport, RemediationOutcome, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// `error:` label for stderr diagnostics.
pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// `note:` label for stderr diagnostics.
pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn severity_tag(sev: Severity, color: bool) -> (String, String) {
    let (tag, icon) = match sev {
        Severity::Error => ("⟦error⟧", "✖"),
        Severity::Warning => ("⟦warn⟧", "▲"),
        Severity::Info => ("⟦info⟧", "◆"),
    };
    if !color {
        return (tag.to_string(), icon.to_string());
    }
    match sev {
        Severity::Error => (tag.red().bold().to_string(), icon.red().to_string()),
        Severity::Warning => (tag.yellow().bold().to_string(), icon.yellow().to_string()),
        Severity::Info => (tag.blue().bold().to_string(), icon.blue().to_string()),
    }
}

/// Print a validation report in the requested format.
pub fn print_report(report: &AggregateReport, file: &str, output: &str) {
    match output {
        "json" => println!("{}", pretty(&compose_report_json(report, file))),
        _ => {
            let color = use_colors(output);
            for r in &report.issues {
                let (sev, icon) = severity_tag(r.issue.severity, color);
                let place = match r.issue.location {
                    Some(loc) => format!("{}:{}:{}", file, loc.line, loc.column),
                    None => file.to_string(),
                };
                let place = if color {
                    place.bold().to_string()
                } else {
                    place
                };
                println!(
                    "{} {} {} ❲{}/{}❳ — {}",
                    icon, sev, place, r.validator, r.issue.kind, r.issue.message
                );
                if let Some(s) = &r.issue.suggestion {
                    if color {
                        println!("    {} {}", "↳".bright_black(), s.bright_black());
                    } else {
                        println!("    ↳ {}", s);
                    }
                }
            }
            let summary = format!(
                "— Summary — score={:.1} errors={} warnings={} infos={} validators={}",
                report.score,
                report.summary.errors,
                report.summary.warnings,
                report.summary.infos,
                report.summary.validators
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print a remediation outcome. When `write` is false the fixed content
/// (or a diff) is shown; otherwise only the file status.
pub fn print_remediation(
    outcome: &RemediationOutcome,
    file: &str,
    original: &str,
    output: &str,
    write: bool,
    diff: bool,
) {
    match output {
        "json" => println!(
            "{}",
            pretty(&compose_remediation_json(outcome, file, original, write, diff))
        ),
        _ => {
            let color = use_colors(output);
            for step in &outcome.steps {
                if step.success {
                    for c in &step.changes {
                        if color {
                            println!("{} {} {}", "✔".green(), step.remediator.bold(), c);
                        } else {
                            println!("✔ {} {}", step.remediator, c);
                        }
                    }
                } else {
                    let err = step.error.as_deref().unwrap_or("failed");
                    if color {
                        println!("{} {} {}", "✖".red(), step.remediator.bold(), err.red());
                    } else {
                        println!("✖ {} {}", step.remediator, err);
                    }
                }
            }
            if !outcome.changed() {
                if color {
                    println!("{} {}", "no changes:".bright_black(), file);
                } else {
                    println!("no changes: {}", file);
                }
            } else if write {
                if color {
                    println!("{} {}", "✏️  fixed:".green().bold(), file.bold());
                } else {
                    println!("✏️  fixed: {}", file);
                }
            } else {
                let body = if diff {
                    build_naive_diff(original, &outcome.final_content)
                } else {
                    outcome.final_content.clone()
                };
                if color {
                    println!("{} {}\n{}", "---".cyan().bold(), file.bold(), body);
                } else {
                    println!("--- {}\n{}", file, body);
                }
            }
        }
    }
}

/// Print plugin metadata for one kind.
pub fn print_plugins(list: &[PluginMetadata], kind: PluginKind, output: &str) {
    match output {
        "json" => println!("{}", pretty(&compose_plugins_json(list, kind))),
        _ => {
            let color = use_colors(output);
            for m in list {
                let tags = m.tags.iter().cloned().collect::<Vec<_>>().join(", ");
                if color {
                    println!(
                        "{} {} [{}] {} {}",
                        m.name.bold(),
                        m.version.bright_black(),
                        m.category.cyan(),
                        m.description,
                        format!("({})", tags).bright_black()
                    );
                } else {
                    println!("{} {} [{}] {} ({})", m.name, m.version, m.category, m.description, tags);
                }
            }
            println!("{} {}(s)", list.len(), kind);
        }
    }
}

/// Line diff that keeps the common head and tail and shows the changed
/// middle as removed/added lines.
pub fn build_naive_diff(old: &str, new: &str) -> String {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let head = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let tail = a[head..]
        .iter()
        .rev()
        .zip(b[head..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let mut out = String::new();
    out.push_str(&format!("@@ line {} @@\n", head + 1));
    for l in &a[head..a.len() - tail] {
        out.push_str(&format!("-{}\n", l));
    }
    for l in &b[head..b.len() - tail] {
        out.push_str(&format!("+{}\n", l));
    }
    out
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &AggregateReport, file: &str) -> JsonVal {
    json!({
        "file": file,
        "score": report.score,
        "issues": report.issues,
        "results": report.results,
        "summary": report.summary,
    })
}

/// Compose remediation JSON object (pure) for testing/snapshot purposes.
pub fn compose_remediation_json(
    outcome: &RemediationOutcome,
    file: &str,
    original: &str,
    write: bool,
    diff: bool,
) -> JsonVal {
    let changed = outcome.changed();
    let preview = changed && !write;
    let content = preview.then(|| outcome.final_content.clone());
    let diff = (preview && diff).then(|| build_naive_diff(original, &outcome.final_content));
    json!({
        "file": file,
        "changed": changed,
        "wrote": write && changed,
        "content": content,
        "diff": diff,
        "changes": outcome.changes,
        "remediators_applied": outcome.remediators_applied,
        "steps": outcome.steps,
    })
}

/// Compose plugin listing JSON object (pure) for testing/snapshot purposes.
pub fn compose_plugins_json(list: &[PluginMetadata], kind: PluginKind) -> JsonVal {
    json!({
        "kind": kind,
        "plugins": list,
        "total": list.len(),
    })
}
