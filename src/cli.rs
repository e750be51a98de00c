//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "proofkit",
    version,
    about = "Validate and fix authored text with pluggable checks",
    long_about = "Proofkit runs validators (readability, structure, grammar, accessibility, inclusive language) over a text document and can chain remediators to fix what they report.\n\nConfiguration precedence: CLI > proofkit.toml > defaults.",
    after_help = "Examples:\n  proofkit check docs/intro.md\n  proofkit check docs/intro.md --validators readability,grammar --output json\n  proofkit fix docs/intro.md --diff\n  proofkit plugins validators --category structure",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(flatten)]
    pub common: Common,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone)]
/// Flags shared by every subcommand.
pub struct Common {
    #[arg(long, global = true, help = "Project root (default: current dir)")]
    pub root: Option<String>,
    #[arg(long, global = true, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, global = true, help = "Directory of plugin manifests (*.toml)")]
    pub plugins: Option<String>,
    #[arg(long, global = true, help = "Per-plugin time budget in ms; 0 disables it")]
    pub timeout_ms: Option<u64>,
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Log debug events to stderr")]
    pub verbose: bool,
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current proofkit version.")]
    Version,
    /// Validate a document
    #[command(
        about = "Run validators",
        long_about = "Run the selected (or configured default) validators over a file and print the combined report. Exits 1 when any error-severity issue is reported.",
        after_help = "Examples:\n  proofkit check README.md\n  proofkit check README.md --validators structure --context audience=beginner"
    )]
    Check {
        #[arg(help = "File to validate")]
        file: String,
        #[arg(long, value_delimiter = ',', help = "Comma-separated validator names")]
        validators: Option<Vec<String>>,
        #[arg(long = "context", value_name = "KEY=VALUE", help = "Context hint passed to plugins (repeatable)")]
        context: Vec<String>,
    },
    /// Validate, then remediate a document
    #[command(
        about = "Apply remediators",
        long_about = "Validate the file, then chain remediators over it. Without --remediators the chain is inferred from the reported issue kinds. Prints the fixed content unless --write is set.",
        after_help = "Examples:\n  proofkit fix README.md --diff\n  proofkit fix README.md --remediators format_corrector --write"
    )]
    Fix {
        #[arg(help = "File to remediate")]
        file: String,
        #[arg(long, value_delimiter = ',', help = "Comma-separated remediator names (in order)")]
        remediators: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',', help = "Validators used to find issues first")]
        validators: Option<Vec<String>>,
        #[arg(long = "context", value_name = "KEY=VALUE", help = "Context hint passed to plugins (repeatable)")]
        context: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write changes back to the file")]
        write: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Show a diff instead of the full content (implies write=false)")]
        diff: bool,
    },
    /// List registered plugins
    #[command(
        about = "List plugins",
        long_about = "List builtin and manifest-discovered plugins of one kind, optionally filtered by category and tag."
    )]
    Plugins {
        #[arg(value_enum, help = "Plugin kind")]
        kind: KindArg,
        #[arg(long, help = "Only plugins in this category")]
        category: Option<String>,
        #[arg(long, help = "Only plugins carrying this tag")]
        tag: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Validators,
    Remediators,
}

/// Parse `key=value` pairs into a context map. Values that parse as JSON
/// (numbers, booleans) keep their type; anything else is a string.
pub fn parse_context(pairs: &[String]) -> Result<crate::models::Context, String> {
    let mut ctx = crate::models::Context::new();
    for pair in pairs {
        let (k, v) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid context '{}': expected KEY=VALUE", pair))?;
        let key = k.trim();
        if key.is_empty() {
            return Err(format!("invalid context '{}': empty key", pair));
        }
        let value = serde_json::from_str::<serde_json::Value>(v)
            .ok()
            .filter(|j| !j.is_object() && !j.is_array())
            .unwrap_or_else(|| serde_json::Value::String(v.to_string()));
        ctx.insert(key.to_string(), value);
    }
    Ok(ctx)
}
