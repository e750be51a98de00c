//! Proofkit CLI binary entry point.
//! Builds the registry, delegates to the managers and prints results.

use clap::Parser;
use proofkit::cli::{self, Cli, Commands, KindArg};
use proofkit::config::{self, Effective};
use proofkit::discovery::ManifestSource;
use proofkit::logging;
use proofkit::models::plugin::{PluginFilter, PluginKind};
use proofkit::models::Context;
use proofkit::output;
use proofkit::registry::Registry;
use proofkit::remediate::RemediationManager;
use proofkit::validate::ValidationManager;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", output::error_prefix(), msg);
    process::exit(2);
}

fn build_registry(eff: &Effective) -> Registry {
    let mut registry = Registry::builtin();
    if let Some(dir) = &eff.plugins_dir {
        if !dir.is_dir() {
            eprintln!(
                "{} plugin directory not found: {}",
                output::note_prefix(),
                dir.to_string_lossy()
            );
        }
        registry.discover_all(&ManifestSource::new(dir));
    }
    registry
}

fn read_input(eff: &Effective, file: &str) -> (PathBuf, String) {
    let path = eff.repo_root.join(file);
    match fs::read_to_string(&path) {
        Ok(s) => (path, s),
        Err(e) => fail(format!("cannot read {}: {}", path.to_string_lossy(), e)),
    }
}

fn context_or_exit(pairs: &[String]) -> Context {
    cli::parse_context(pairs).unwrap_or_else(|e| fail(e))
}

fn main() {
    let cli = Cli::parse();
    let common = cli.common;
    logging::init_tracing(common.log_json, logging::level_for(common.verbose));

    if let Commands::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let eff = config::resolve_effective(
        common.root.as_deref(),
        common.output.as_deref(),
        common.plugins.as_deref(),
        common.timeout_ms,
    )
    .unwrap_or_else(|e| fail(e));
    let registry = Arc::new(build_registry(&eff));

    match cli.cmd {
        Commands::Version => {}
        Commands::Check {
            file,
            validators,
            context,
        } => {
            let ctx = context_or_exit(&context);
            let (_, content) = read_input(&eff, &file);
            let manager = ValidationManager::new(Arc::clone(&registry), eff.validation.clone());
            let report = manager.validate(&content, validators.as_deref(), Some(&ctx));
            output::print_report(&report, &file, &eff.output);
            if report.has_errors() {
                process::exit(1);
            }
        }
        Commands::Fix {
            file,
            remediators,
            validators,
            context,
            write,
            diff,
        } => {
            let ctx = context_or_exit(&context);
            let (path, content) = read_input(&eff, &file);
            let issues = ValidationManager::new(Arc::clone(&registry), eff.validation.clone())
                .validate(&content, validators.as_deref(), Some(&ctx))
                .flat_issues();
            let manager = RemediationManager::new(Arc::clone(&registry), eff.remediation.clone());
            let outcome = manager.remediate(&content, &issues, remediators.as_deref(), Some(&ctx));
            let write = write && !diff;
            if write && outcome.changed() {
                if let Err(e) = fs::write(&path, &outcome.final_content) {
                    fail(format!("cannot write {}: {}", path.to_string_lossy(), e));
                }
            }
            output::print_remediation(&outcome, &file, &content, &eff.output, write, diff);
            if outcome.steps.iter().any(|s| !s.success) {
                process::exit(1);
            }
        }
        Commands::Plugins {
            kind,
            category,
            tag,
        } => {
            let kind = match kind {
                KindArg::Validators => PluginKind::Validator,
                KindArg::Remediators => PluginKind::Remediator,
            };
            let list = registry.list(kind, &PluginFilter { category, tag });
            output::print_plugins(&list, kind, &eff.output);
        }
    }
}
